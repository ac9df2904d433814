use thiserror::Error;

pub const MSG_TEMPORARILY_UNAVAILABLE: &str =
    "The service is temporarily unavailable. Please try again in a moment.";
pub const MSG_SERVICE_UNAVAILABLE: &str =
    "The service is unavailable. It may be starting up — please try again in a moment.";
pub const MSG_TOOK_TOO_LONG: &str = "The request took too long. Please try again.";
pub const MSG_PROFILE_UNAVAILABLE: &str = "Unable to load profile.";
pub const MSG_SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

/// Failure of a call to the remote CV API.
///
/// Every variant is translated into a single user-facing sentence at the call
/// site; none of them is allowed to escape the session as a fault.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    /// Network unreachable, DNS failure, connection refused.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    /// 5xx status. `detail` is whatever the body's `detail`/`error` field carried.
    #[error("Server fault (status {status})")]
    ServerFault {
        status: u16,
        detail: Option<String>,
    },

    /// Non-5xx, non-2xx status.
    #[error("Request rejected (status {status})")]
    ClientRejected {
        status: u16,
        detail: Option<String>,
    },

    /// 2xx whose body could not be parsed at all.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RemoteError {
    /// Classifies a non-2xx status plus the detail parsed from its body.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        if (500..600).contains(&status) {
            RemoteError::ServerFault { status, detail }
        } else {
            RemoteError::ClientRejected { status, detail }
        }
    }

    /// Message shown when the profile document cannot be loaded.
    pub fn profile_message(&self) -> String {
        match self {
            RemoteError::ServerFault { status: 500, .. } => MSG_TEMPORARILY_UNAVAILABLE.to_string(),
            RemoteError::ServerFault { .. } | RemoteError::ClientRejected { .. } => {
                MSG_PROFILE_UNAVAILABLE.to_string()
            }
            RemoteError::Transport(_) | RemoteError::Timeout => MSG_SERVICE_UNAVAILABLE.to_string(),
            RemoteError::MalformedResponse(_) | RemoteError::Unexpected(_) => {
                MSG_SOMETHING_WENT_WRONG.to_string()
            }
        }
    }

    /// Message appended to the transcript when a question fails.
    pub fn ask_message(&self) -> String {
        match self {
            // 500 hides whatever the body says.
            RemoteError::ServerFault { status: 500, .. } => MSG_TEMPORARILY_UNAVAILABLE.to_string(),
            RemoteError::ServerFault { status, detail }
            | RemoteError::ClientRejected { status, detail } => detail
                .clone()
                .unwrap_or_else(|| format!("Request failed ({status})")),
            RemoteError::Timeout => MSG_TOOK_TOO_LONG.to_string(),
            RemoteError::Transport(_) => MSG_SERVICE_UNAVAILABLE.to_string(),
            RemoteError::MalformedResponse(_) | RemoteError::Unexpected(_) => {
                MSG_SOMETHING_WENT_WRONG.to_string()
            }
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_decode() {
            RemoteError::MalformedResponse(e.to_string())
        } else if e.is_builder() {
            RemoteError::Unexpected(e.to_string())
        } else if e.is_connect() || e.is_request() {
            RemoteError::Transport(e.to_string())
        } else {
            RemoteError::Unexpected(e.to_string())
        }
    }
}

/// Extracts a human-readable message from an error body.
///
/// Looks at `detail` first, then `error`. Accepts a plain string, an array of
/// `{ "msg": ... }` objects (joined with ", "), or an `{ "message": ... }`
/// envelope.
pub fn parse_error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(detail_text)
}

fn detail_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.as_str()),
                other => other.get("msg").and_then(|m| m.as_str()),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
