//! CV API client — the single point of entry for every call to the backend.
//!
//! The rest of the crate talks to the `CvApi` trait; `HttpCvApi` is the
//! reqwest-backed implementation. Errors come back as `RemoteError` and are
//! translated into user-facing text by the caller.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{parse_error_detail, RemoteError};
use crate::models::message::HistoryEntry;
use crate::models::profile::ProfileDocument;

pub const NO_ANSWER_RECEIVED: &str = "No answer received.";

/// Body of `POST <base>/ask`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub history: Vec<HistoryEntry>,
}

/// Body of a successful `/ask` response. `answer` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl AskResponse {
    #[cfg(test)]
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            answer: Some(text.into()),
        }
    }

    /// Parses a 2xx body. Only unparsable JSON is an error; a missing or
    /// non-string `answer` just yields `None`.
    pub fn from_body(body: &str) -> Result<Self, RemoteError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
        Ok(Self {
            answer: value
                .get("answer")
                .and_then(|a| a.as_str())
                .map(str::to_string),
        })
    }

    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or(NO_ANSWER_RECEIVED)
    }
}

/// Remote operations the client core depends on.
///
/// Carried as `Arc<dyn CvApi>` so tests can swap in an in-memory fake.
#[async_trait]
pub trait CvApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<ProfileDocument, RemoteError>;

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, RemoteError>;
}

/// reqwest-backed implementation of `CvApi`.
#[derive(Clone)]
pub struct HttpCvApi {
    client: Client,
    base_url: String,
}

impl HttpCvApi {
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CvApi for HttpCvApi {
    async fn fetch_profile(&self) -> Result<ProfileDocument, RemoteError> {
        let url = self.endpoint("cv");
        debug!("GET {url}");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Profile request to {url} failed: {e}");
            RemoteError::from(e)
        })?;
        let body = success_body(response).await?;

        serde_json::from_str(&body).map_err(|e| {
            warn!("Profile document from {url} could not be parsed: {e}");
            RemoteError::MalformedResponse(e.to_string())
        })
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, RemoteError> {
        let url = self.endpoint("ask");
        debug!(
            "POST {url} (question: {} chars, history: {} entries)",
            request.question.len(),
            request.history.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Ask request to {url} failed: {e}");
                RemoteError::from(e)
            })?;
        let body = success_body(response).await?;

        AskResponse::from_body(&body)
    }
}

/// Returns the body of a 2xx response, or the classified error for anything else.
///
/// The status decides the outcome; a failure body that cannot be read is
/// treated as empty.
async fn success_body(response: Response) -> Result<String, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(failure_from(status, &body))
}

fn failure_from(status: StatusCode, body: &str) -> RemoteError {
    warn!("CV API returned {status}: {body}");
    RemoteError::from_status(status.as_u16(), parse_error_detail(body))
}
