use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Backend used when POSTWISE_API_URL is unset (the FastAPI dev server).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Request timeout used when POSTWISE_TIMEOUT_SECS is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so either
/// source works.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction service; `/api/predict` is appended.
    pub api_url: String,
    /// Upper bound on a single prediction request. Exceeding it is reported
    /// as a network error.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let api_url = env::var("POSTWISE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let request_timeout = match env::var("POSTWISE_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(parse_timeout(&raw)?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }

    /// Check that the API URL is usable.
    /// Call this before constructing an HTTP client.
    pub fn require_api_url(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!(
                "POSTWISE_API_URL is empty. Set it in your .env file \
                 (e.g. POSTWISE_API_URL={DEFAULT_API_URL})."
            );
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            anyhow::bail!(
                "POSTWISE_API_URL must start with http:// or https://, got '{}'",
                self.api_url
            );
        }
        Ok(())
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("POSTWISE_TIMEOUT_SECS must be a whole number, got '{raw}'"))?;
    if secs == 0 {
        anyhow::bail!("POSTWISE_TIMEOUT_SECS must be greater than zero");
    }
    Ok(secs)
}
