//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, "/users/:id", handler)
//!     → matcher.rs (parse into Literal / Param segments)
//!     → table.rs (reject duplicates, append per method)
//!     → Freeze as Router, or publish via SharedRouter
//!
//! Incoming Request (method, path)
//!     → router.rs (split path, scan routes for method)
//!     → matcher.rs (structural match, capture params)
//!     → Return: Matched(route, bindings) or NoMatch
//! ```
//!
//! # Design Decisions
//! - Deterministic: same table and input always give the same result
//! - First match wins (registration order is the only precedence rule)
//! - No I/O and no suspension points in dispatch
//! - Registration errors fail fast; no-match is a normal outcome

pub mod bindings;
pub mod error;
pub mod matcher;
pub mod router;
pub mod table;

pub use bindings::Bindings;
pub use error::RegistrationError;
pub use matcher::{Pattern, SegmentMatcher};
pub use router::{MatchResult, Router, SharedRouter};
pub use table::{Route, RouteTable};
