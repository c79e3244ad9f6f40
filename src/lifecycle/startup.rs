//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated route configs into a route table of handlers
//! - Halt startup on the first registration error
//!
//! # Design Decisions
//! - Fail fast: a skipped route would be a silent behavioral gap
//! - Routes register in config order, which is their precedence order

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::validation::join_errors;
use crate::config::{RouteConfig, ValidationError};
use crate::http::handler::{SharedHandler, TextHandler};
use crate::routing::{RegistrationError, RouteTable};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid config: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("route {route}: {source}")]
    Route {
        route: String,
        #[source]
        source: RegistrationError,
    },

    #[error("route {route}: invalid status code {status}")]
    InvalidStatus { route: String, status: u16 },
}

/// Build the route table for a list of route configs.
pub fn build_route_table(routes: &[RouteConfig]) -> Result<RouteTable<SharedHandler>, StartupError> {
    let mut table: RouteTable<SharedHandler> = RouteTable::new();

    for route in routes {
        let status = StatusCode::from_u16(route.status).map_err(|_| StartupError::InvalidStatus {
            route: route.display_name(),
            status: route.status,
        })?;
        let handler: SharedHandler = Arc::new(TextHandler::new(status, route.body.clone()));

        table
            .register(&route.method, &route.pattern, handler)
            .map_err(|source| StartupError::Route {
                route: route.display_name(),
                source,
            })?;
    }

    tracing::info!(
        routes = table.len(),
        methods = ?table.methods().collect::<Vec<_>>(),
        "Route table built"
    );
    Ok(table)
}
