use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use eden_core::gate::normalize_secret;
use eden_core::provider::resolve_base_dir;

#[derive(Clone)]
pub struct Config {
    /// Shared secret for the auth cookie (`DASHBOARD_SECRET`).
    /// `None` when unset or blank; every gated page then redirects to login.
    pub dashboard_secret: Option<String>,
    /// Directory holding `status.json` (`CLAWD_DIR`).
    /// Defaults to `~/clawd`.
    pub snapshot_dir: PathBuf,
    pub port: u16,
    pub bind_addr: String,
    /// Add `Secure` to the auth cookie. Enable when served over HTTPS.
    pub secure_cookie: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let dashboard_secret = parse_dashboard_secret(lookup("DASHBOARD_SECRET"));

        let snapshot_dir = resolve_base_dir(lookup("CLAWD_DIR"), dirs::home_dir());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());

        let secure_cookie = lookup("SECURE_COOKIE")
            .unwrap_or_else(|| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        Ok(Config {
            dashboard_secret,
            snapshot_dir,
            port,
            bind_addr,
            secure_cookie,
        })
    }
}

/// Parse DASHBOARD_SECRET from an optional string value.
///
/// Returns None if the value is missing, empty, or contains only whitespace.
/// An empty secret must never match an empty or absent cookie.
pub fn parse_dashboard_secret(value: Option<String>) -> Option<String> {
    normalize_secret(value)
}
