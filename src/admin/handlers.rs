use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub routes: usize,
}

/// One registered route, as listed by the admin API.
#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
    pub params: Vec<String>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        routes: state.router.snapshot().table().len(),
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteInfo>> {
    let snapshot = state.router.snapshot();
    let routes = snapshot
        .table()
        .iter()
        .map(|route| RouteInfo {
            method: route.method().to_string(),
            pattern: route.pattern().to_string(),
            params: route.pattern().param_names().map(String::from).collect(),
        })
        .collect();
    Json(routes)
}
