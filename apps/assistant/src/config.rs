use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_API_ORIGIN: &str = "http://127.0.0.1:8000";

/// Client configuration loaded from environment variables.
/// Every variable is optional; invalid values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute base URL of the CV API, without a trailing slash.
    pub api_base_url: String,
    /// Transport-level timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let origin = get("API_ORIGIN").unwrap_or_else(|| DEFAULT_API_ORIGIN.to_string());
        let base = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            api_base_url: resolve_base_url(&origin, &base)?,
            request_timeout,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
        })
    }
}

/// Resolves the API base against the origin when it is relative (e.g. `/api`).
fn resolve_base_url(origin: &str, base: &str) -> Result<String> {
    let base = base.trim();
    let url = match Url::parse(base) {
        Ok(absolute) => absolute,
        Err(_) => {
            let origin = Url::parse(origin.trim())
                .with_context(|| format!("API_ORIGIN '{origin}' is not a valid URL"))?;
            origin
                .join(base)
                .with_context(|| format!("API_BASE_URL '{base}' cannot be resolved against {origin}"))?
        }
    };
    Ok(url.as_str().trim_end_matches('/').to_string())
}
