//! Admin API.
//!
//! Read-only view of the live route table, served on its own listener and
//! guarded by a bearer token.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::http::server::AppRouter;
use self::auth::admin_auth_middleware;
use self::handlers::*;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub router: Arc<AppRouter>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(router: Arc<AppRouter>, api_key: &str) -> Self {
        Self {
            router,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::build_route_table;
    use crate::config::RouterConfig;
    use crate::routing::SharedRouter;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn admin_app() -> Router {
        let table = build_route_table(&RouterConfig::default().routes).unwrap();
        let state = AdminState::new(Arc::new(SharedRouter::new(table)), "secret");
        setup_admin_router(state)
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (status, _) = get_json(admin_app(), "/admin/status", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get_json(admin_app(), "/admin/status", Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status() {
        let (status, json) = get_json(admin_app(), "/admin/status", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "operational");
        assert_eq!(json["routes"], 2);
    }

    #[tokio::test]
    async fn test_routes_listing() {
        let (status, json) = get_json(admin_app(), "/admin/routes", Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!([
                { "method": "GET", "pattern": "/", "params": [] },
                { "method": "GET", "pattern": "/:url", "params": ["url"] },
            ])
        );
    }
}
