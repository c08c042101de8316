//! Cookie authentication: the gate middleware plus the login endpoints.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use eden_core::{cookie_value, GateDecision, AUTH_COOKIE};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Middleware: run every request through the gate.
pub async fn gate_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let cookie = cookie_value(
        request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
        AUTH_COOKIE,
    );

    let decision = state.gate.evaluate(request.uri().path(), cookie);

    match decision {
        GateDecision::Pass | GateDecision::Exempt => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!(
                "Redirecting unauthenticated request for {} to {}",
                request.uri().path(),
                target
            );
            Redirect::temporary(&target).into_response()
        }
    }
}

/// `Set-Cookie` value carrying the secret.
fn auth_cookie(value: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", AUTH_COOKIE, value);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the auth cookie.
fn expired_auth_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        AUTH_COOKIE
    )
}

/// Handler: GET /login
pub async fn login_page() -> Html<&'static str> {
    Html(include_str!("login.html"))
}

/// Handler: POST /api/auth
///
/// Sets the auth cookie when the submitted password equals the shared secret.
pub async fn post_auth(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AuthRequest>,
) -> Response {
    if !state.gate.accepts(Some(&body.password)) {
        if state.gate.is_configured() {
            warn!("Rejected login attempt with wrong password");
        } else {
            warn!("Rejected login attempt: DASHBOARD_SECRET is not configured");
        }
        return (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse {
                ok: false,
                error: Some("Invalid password".to_string()),
            }),
        )
            .into_response();
    }

    info!("Login succeeded");
    (
        [(header::SET_COOKIE, auth_cookie(&body.password, state.secure_cookie))],
        Json(AuthResponse {
            ok: true,
            error: None,
        }),
    )
        .into_response()
}

/// Handler: POST /api/logout
pub async fn post_logout() -> Response {
    (
        [(header::SET_COOKIE, expired_auth_cookie())],
        Json(AuthResponse {
            ok: true,
            error: None,
        }),
    )
        .into_response()
}
