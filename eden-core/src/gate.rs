//! Per-request access decision.
//!
//! Every inbound request is classified before it reaches a handler. The
//! machine-readable API and the login page are always reachable; everything
//! else needs the auth cookie to carry the shared secret.

use std::fmt;

/// Paths starting with this prefix are never gated.
pub const API_PREFIX: &str = "/api/";

/// The login page path, also the redirect target for unauthenticated requests.
pub const LOGIN_PATH: &str = "/login";

/// Name of the cookie that carries the shared secret once logged in.
pub const AUTH_COOKIE: &str = "eden-auth";

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Authenticated; forward untouched.
    Pass,
    /// Path must always be reachable; forward untouched.
    Exempt,
    /// Not authenticated; send the client to the given path.
    Redirect(String),
}

/// Treat a missing, empty, or whitespace-only secret as unset.
///
/// Non-blank secrets are kept exactly as given (no trimming).
pub fn normalize_secret(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Find a cookie by name across one or more `Cookie` header values.
///
/// The value is returned exactly as it appears after the first `=`.
pub fn cookie_value<'a, I>(header_values: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    header_values.into_iter().find_map(|header| {
        header.split(';').find_map(|pair| {
            let (key, value) = pair.trim_start().split_once('=')?;
            (key == name).then_some(value)
        })
    })
}

/// The request gate. Holds the shared secret injected at construction.
#[derive(Clone)]
pub struct RequestGate {
    secret: Option<String>,
    api_prefix: String,
    login_path: String,
}

impl fmt::Debug for RequestGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestGate")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_prefix", &self.api_prefix)
            .field("login_path", &self.login_path)
            .finish()
    }
}

impl RequestGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: normalize_secret(secret),
            api_prefix: API_PREFIX.to_string(),
            login_path: LOGIN_PATH.to_string(),
        }
    }

    /// Whether a usable secret was configured. When false nothing can log in.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Compare a presented credential against the shared secret.
    ///
    /// Exact byte comparison. Always false when no secret is configured.
    pub fn accepts(&self, candidate: Option<&str>) -> bool {
        match (self.secret.as_deref(), candidate) {
            (Some(secret), Some(candidate)) => secret.as_bytes() == candidate.as_bytes(),
            _ => false,
        }
    }

    /// Classify a request by path and the auth cookie value, if any.
    ///
    /// The exemptions are checked before the credential so the API and the
    /// login page stay reachable with a missing or wrong cookie.
    pub fn evaluate(&self, path: &str, cookie: Option<&str>) -> GateDecision {
        if path.starts_with(&self.api_prefix) {
            return GateDecision::Exempt;
        }
        if path == self.login_path {
            return GateDecision::Exempt;
        }
        if self.accepts(cookie) {
            return GateDecision::Pass;
        }
        GateDecision::Redirect(self.login_path.clone())
    }
}
