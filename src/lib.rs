//! Method + path router with segment patterns and named parameters.
//!
//! The `routing` module is the core: a route table of `(method, pattern)`
//! entries and a first-match-wins dispatcher. Everything else serves that
//! table over HTTP.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Bindings, MatchResult, RegistrationError, RouteTable, Router, SharedRouter};
