// PredictionClient — sends one payload to the backend and returns a typed result.
//
// The client is stateless per call; it does not serialize or deduplicate
// requests. Keeping a single request in flight is the session's job.
// Every reqwest failure, non-2xx status and malformed body is mapped into
// PredictionError here, so nothing above this layer sees a transport error.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::PredictionError;
use super::payload::PredictionPayload;
use super::result::PredictionResult;
use crate::config::Config;
use crate::output::truncate_chars;

/// Path of the prediction endpoint, relative to the API base URL.
pub const PREDICT_PATH: &str = "/api/predict";

/// Longest server error body we'll echo into a user-facing message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Anything that can turn a payload into a prediction.
///
/// The HTTP client is the production implementation; tests plug in
/// in-memory backends to drive the session deterministically.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(
        &self,
        payload: &PredictionPayload,
    ) -> Result<PredictionResult, PredictionError>;
}

/// Response from the backend's `GET /` liveness route.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// reqwest-backed client for the prediction service.
pub struct HttpPredictionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionClient {
    /// Create a client for the given base URL with a bounded request timeout.
    /// A timeout surfaces as `PredictionError::Network`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("postwise/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout)
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// Ping the backend root route.
    pub async fn health(&self) -> Result<HealthStatus, PredictionError> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(server_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| PredictionError::parse(format!("invalid health response: {e}")))
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionClient {
    async fn predict(
        &self,
        payload: &PredictionPayload,
    ) -> Result<PredictionResult, PredictionError> {
        let url = self.predict_url();

        debug!(
            url = %url,
            platform = %payload.platform,
            caption_preview = %truncate_chars(&payload.caption, 40),
            followers = payload.followers,
            "Sending prediction request"
        );

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(server_error(status, &body));
        }

        let result = PredictionResult::from_json(&body)?;
        debug!(
            best_day = result.best_day,
            best_hour = result.best_hour,
            topic = %result.nlp_insights.topic,
            "Prediction received"
        );
        Ok(result)
    }
}

/// FastAPI error bodies look like `{"detail": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn server_error(status: reqwest::StatusCode, body: &str) -> PredictionError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
    };

    PredictionError::Server {
        status: status.as_u16(),
        message,
    }
}
