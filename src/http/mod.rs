//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → server.rs dispatch bridge → routing::SharedRouter::dispatch
//!     → Matched: handler.rs (Handler::call with bindings)
//!       NoMatch: 404 "Cannot METHOD path"
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod server;

pub use handler::{Handler, RequestContext, SharedHandler, TextHandler, TextResponse};
pub use request::X_REQUEST_ID;
pub use server::{AppRouter, HttpServer};
