//! Machine-readable endpoints under `/api/`.
//!
//! These stay reachable without the auth cookie so the automation agent can
//! poll them.

use axum::{extract::State, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use eden_core::{builtin_snapshot, StatusSnapshot};

use crate::AppState;

/// Load the snapshot on a blocking thread.
///
/// Always yields a snapshot; if the loader task itself dies, the built-in
/// snapshot is served.
pub async fn load_snapshot(state: &AppState) -> StatusSnapshot {
    let provider = state.provider.clone();
    match tokio::task::spawn_blocking(move || provider.snapshot()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Snapshot loader task failed: {}", e);
            builtin_snapshot(chrono::Utc::now())
        }
    }
}

/// Handler: GET /api/status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusSnapshot> {
    Json(load_snapshot(&state).await)
}

/// Handler: GET /api/health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "eden",
        "version": eden_core::get_version(),
    }))
}
