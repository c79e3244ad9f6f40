//! Route registry.
//!
//! # Responsibilities
//! - Parse and validate routes at registration time
//! - Reject duplicate (method, pattern) pairs
//! - Partition routes by method, preserving registration order
//!
//! # Design Decisions
//! - Methods are normalized (trimmed, ASCII upper-case) before storage
//! - Routes are held behind `Arc` so snapshots clone cheaply
//! - A failed registration never modifies the table

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::routing::error::RegistrationError;
use crate::routing::matcher::Pattern;

/// A (method, pattern) pair bound to a handler.
pub struct Route<H> {
    method: String,
    pattern: Pattern,
    handler: H,
}

impl<H> Route<H> {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H> fmt::Debug for Route<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .finish_non_exhaustive()
    }
}

/// Normalize an HTTP method for storage and lookup.
///
/// Returns `None` if the method is empty or contains non-token characters.
pub fn normalize_method(method: &str) -> Option<String> {
    let method = method.trim();
    if method.is_empty() || !method.bytes().all(is_token_byte) {
        return None;
    }
    Some(method.to_ascii_uppercase())
}

// RFC 9110 tchar
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// Registered routes, partitioned by method.
pub struct RouteTable<H> {
    by_method: BTreeMap<String, Vec<Arc<Route<H>>>>,
    len: usize,
}

impl<H> RouteTable<H> {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self {
            by_method: BTreeMap::new(),
            len: 0,
        }
    }

    /// Register a route.
    ///
    /// Fails with `DuplicateRoute` if the same method and matcher sequence
    /// is already present, with `MalformedPattern` for bad parameter names,
    /// and with `InvalidMethod` for an unusable method.
    pub fn register(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<(), RegistrationError> {
        let method = normalize_method(method)
            .ok_or_else(|| RegistrationError::InvalidMethod(method.to_string()))?;
        let pattern = Pattern::parse(pattern)?;

        let routes = self.by_method.entry(method.clone()).or_default();
        if routes.iter().any(|r| r.pattern == pattern) {
            return Err(RegistrationError::DuplicateRoute {
                method,
                pattern: pattern.to_string(),
            });
        }

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        routes.push(Arc::new(Route {
            method,
            pattern,
            handler,
        }));
        self.len += 1;
        Ok(())
    }

    /// Routes for `method` in registration order.
    ///
    /// Each call starts a fresh iteration; an unknown method yields nothing.
    pub fn routes_for(&self, method: &str) -> Routes<'_, H> {
        let routes = normalize_method(method)
            .and_then(|m| self.by_method.get(&m))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Routes {
            inner: routes.iter(),
        }
    }

    /// All routes: methods in sorted order, registration order within each.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route<H>>> {
        self.by_method.values().flatten()
    }

    /// Methods that have at least one route.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.by_method.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: cloning only bumps the `Arc`s, so `H` need not be `Clone`.
impl<H> Clone for RouteTable<H> {
    fn clone(&self) -> Self {
        Self {
            by_method: self.by_method.clone(),
            len: self.len,
        }
    }
}

impl<H> fmt::Debug for RouteTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over the routes registered for one method.
pub struct Routes<'a, H> {
    inner: std::slice::Iter<'a, Arc<Route<H>>>,
}

impl<'a, H> Iterator for Routes<'a, H> {
    type Item = &'a Arc<Route<H>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<H> ExactSizeIterator for Routes<'_, H> {}
