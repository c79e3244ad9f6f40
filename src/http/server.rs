//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router that funnels every request to the dispatch bridge
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener, start the admin API when enabled
//! - Apply route table reloads while serving
//! - Render `Matched` / `NoMatch` into HTTP responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::{setup_admin_router, AdminState};
use crate::config::{validate_config, RouterConfig};
use crate::http::handler::{Handler, RequestContext, SharedHandler};
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::lifecycle::startup::{build_route_table, StartupError};
use crate::lifecycle::{shutdown, signals};
use crate::observability::metrics;
use crate::routing::{MatchResult, RouteTable, SharedRouter};

/// The router type served over HTTP.
pub type AppRouter = SharedRouter<SharedHandler>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<AppRouter>,
}

/// HTTP server in front of the route table.
pub struct HttpServer {
    app: Router,
    config: RouterConfig,
    router: Arc<AppRouter>,
}

impl HttpServer {
    /// Create a server for an already built route table.
    pub fn new(config: RouterConfig, table: RouteTable<SharedHandler>) -> Self {
        let router = Arc::new(SharedRouter::new(table));
        let state = AppState {
            router: router.clone(),
        };
        let app = Self::build_app(&config, state);
        Self { app, config, router }
    }

    /// Validate `config`, build its route table and create the server.
    pub fn from_config(config: RouterConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(StartupError::Config)?;
        let table = build_route_table(&config.routes)?;
        Ok(Self::new(config, table))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The shared router, for runtime registration.
    pub fn router(&self) -> Arc<AppRouter> {
        self.router.clone()
    }

    /// The Axum application, for in-process use.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve until shutdown.
    ///
    /// Fails before serving if the admin API is enabled and its address
    /// cannot be bound. Configs received on `config_updates` replace the route table; a config
    /// whose routes fail to build is logged and ignored.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.router.snapshot().table().len(),
            "HTTP server starting"
        );

        let reload = tokio::spawn(apply_updates(self.router.clone(), config_updates));

        if self.config.admin.enabled {
            let admin_state = AdminState::new(self.router.clone(), &self.config.admin.api_key);
            if let Err(e) = spawn_admin(
                &self.config.admin.bind_address,
                admin_state,
                shutdown_rx.resubscribe(),
            )
            .await
            {
                reload.abort();
                return Err(e);
            }
        }

        let result = axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown::wait(shutdown_rx) => {},
                    _ = signals::shutdown_signal() => {},
                }
            })
            .await;

        reload.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}

async fn spawn_admin(
    bind_address: &str,
    state: AdminState,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind_address).await.map_err(|e| {
        tracing::error!(address = %bind_address, error = %e, "Failed to bind admin API");
        e
    })?;
    tracing::info!(address = %bind_address, "Admin API listening");

    let app = setup_admin_router(state);
    tokio::spawn(async move {
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await;
        if let Err(e) = served {
            tracing::error!(error = %e, "Admin API failed");
        }
    });
    Ok(())
}

/// Rebuild and swap the route table for each incoming config.
pub async fn apply_updates(
    router: Arc<AppRouter>,
    mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
) {
    while let Some(config) = config_updates.recv().await {
        match build_route_table(&config.routes) {
            Ok(table) => {
                router.replace(table);
                tracing::info!("Routes reloaded (listener and admin settings need a restart)");
            }
            Err(e) => {
                tracing::error!(error = %e, "Reload rejected, keeping current routes");
            }
        }
    }
}

/// Dispatch bridge: one call into the route table per request.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let ctx = RequestContext {
        method: request.method().as_str().to_string(),
        path: request.uri().path().to_string(),
        request_id: request_id_of(&request),
    };

    let router = state.router.snapshot();
    let method_label = metrics::method_label(&ctx.method, router.table().methods());

    match router.dispatch(&ctx.method, &ctx.path) {
        MatchResult::Matched { route, bindings } => {
            let response = route.handler().call(&ctx, &bindings);
            tracing::debug!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                pattern = %route.pattern(),
                status = response.status.as_u16(),
                "Request dispatched"
            );
            metrics::record_request(method_label, "matched", response.status.as_u16(), start);
            response.into_response()
        }
        MatchResult::NoMatch => {
            tracing::debug!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                "No route matched"
            );
            metrics::record_request(method_label, "no_match", 404, start);
            (
                StatusCode::NOT_FOUND,
                format!("Cannot {} {}", ctx.method, ctx.path),
            )
                .into_response()
        }
    }
}
