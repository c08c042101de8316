pub mod auth;
pub mod config;
pub mod dashboard;
pub mod status;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use eden_core::{RequestGate, StatusProvider};

use crate::config::Config;

pub struct AppState {
    pub gate: RequestGate,
    pub provider: StatusProvider,
    pub secure_cookie: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gate: RequestGate::new(config.dashboard_secret.clone()),
            provider: StatusProvider::from_base_dir(&config.snapshot_dir),
            secure_cookie: config.secure_cookie,
        }
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the full application: every route, including the 404 fallback,
/// sits behind the request gate.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard::handlers::get_dashboard_html))
        .route("/login", get(auth::login_page))
        .route("/api/status", get(status::get_status))
        .route("/api/health", get(status::health_check))
        .route("/api/auth", post(auth::post_auth))
        .route("/api/logout", post(auth::post_logout))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::gate_requests,
                )),
        )
        .with_state(state)
}
