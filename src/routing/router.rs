//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Normalize request paths into segments
//! - Find the first registered route that structurally matches
//! - Return the matched route with its bindings, or an explicit no-match
//!
//! # Design Decisions
//! - First match in registration order wins; there is no specificity score
//! - `Router` is immutable after construction (thread-safe without locks)
//! - `SharedRouter` swaps whole snapshots for runtime registration
//! - O(n) scan over the routes of one method

use std::fmt;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::routing::bindings::Bindings;
use crate::routing::error::RegistrationError;
use crate::routing::matcher::{split_segments, QUERY_DELIMITERS};
use crate::routing::table::{Route, RouteTable};

/// Outcome of a dispatch.
pub enum MatchResult<H> {
    /// A route matched; `bindings` holds its captured parameters.
    Matched {
        route: Arc<Route<H>>,
        bindings: Bindings,
    },
    /// No route matched. Not an error: the boundary maps it to "not found".
    NoMatch,
}

impl<H> MatchResult<H> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// The matched route, if any.
    pub fn route(&self) -> Option<&Arc<Route<H>>> {
        match self {
            MatchResult::Matched { route, .. } => Some(route),
            MatchResult::NoMatch => None,
        }
    }

    /// The captured bindings, if any.
    pub fn bindings(&self) -> Option<&Bindings> {
        match self {
            MatchResult::Matched { bindings, .. } => Some(bindings),
            MatchResult::NoMatch => None,
        }
    }
}

impl<H> fmt::Debug for MatchResult<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Matched { route, bindings } => f
                .debug_struct("Matched")
                .field("route", route)
                .field("bindings", bindings)
                .finish(),
            MatchResult::NoMatch => f.write_str("NoMatch"),
        }
    }
}

/// Dispatches requests against an immutable route table.
pub struct Router<H> {
    table: RouteTable<H>,
}

impl<H> Router<H> {
    pub fn new(table: RouteTable<H>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable<H> {
        &self.table
    }

    /// Match `method` and `path` against the registered routes.
    ///
    /// Any query string or fragment on `path` is ignored.
    pub fn dispatch(&self, method: &str, path: &str) -> MatchResult<H> {
        let path = strip_query(path);
        let segments: Vec<&str> = split_segments(path).collect();

        for route in self.table.routes_for(method) {
            if let Some(bindings) = route.pattern().match_segments(&segments) {
                tracing::trace!(
                    method = %route.method(),
                    pattern = %route.pattern(),
                    path = %path,
                    "Route matched"
                );
                return MatchResult::Matched {
                    route: Arc::clone(route),
                    bindings,
                };
            }
        }

        tracing::trace!(method = %method, path = %path, "No route matched");
        MatchResult::NoMatch
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new(RouteTable::new())
    }
}

impl<H> From<RouteTable<H>> for Router<H> {
    fn from(table: RouteTable<H>) -> Self {
        Self::new(table)
    }
}

fn strip_query(path: &str) -> &str {
    match path.find(|c: char| QUERY_DELIMITERS.contains(&c)) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// A router that accepts registrations while serving.
///
/// Readers load the current snapshot without locking. Writers are
/// serialized by a mutex and publish a fresh snapshot atomically, so a
/// dispatch never observes a partially updated table.
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
    write_lock: Mutex<()>,
}

impl<H> SharedRouter<H> {
    pub fn new(table: RouteTable<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(Router::new(table)),
            write_lock: Mutex::new(()),
        }
    }

    /// Dispatch against the current snapshot.
    pub fn dispatch(&self, method: &str, path: &str) -> MatchResult<H> {
        self.current.load().dispatch(method, path)
    }

    /// The current snapshot. Later writes do not affect it.
    pub fn snapshot(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Register a route and publish the updated table.
    ///
    /// On error the published table is unchanged.
    pub fn register(
        &self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<(), RegistrationError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut table = self.current.load().table().clone();
        table.register(method, pattern, handler)?;
        self.current.store(Arc::new(Router::new(table)));
        Ok(())
    }

    /// Replace the whole table, e.g. after a configuration reload.
    pub fn replace(&self, table: RouteTable<H>) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        tracing::info!(routes = table.len(), "Route table replaced");
        self.current.store(Arc::new(Router::new(table)));
    }
}

impl<H> Default for SharedRouter<H> {
    fn default() -> Self {
        Self::new(RouteTable::new())
    }
}
