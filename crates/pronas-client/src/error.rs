use serde::Deserialize;
use thiserror::Error;

/// The single failure signal of a resource call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never reached the server or the response never came back.
    #[error("HTTP request failed: {0}")]
    Network(String),
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ClientError {
    /// Build a [`ClientError::Server`] from a non-2xx response body, preferring
    /// the JSON `detail` field when the server sent one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
            Err(_) => body.to_string(),
        };
        Self::Server { status, detail }
    }

    /// Reclassify a 404 as [`ClientError::NotFound`] for `resource`.
    pub fn or_not_found(self, resource: impl FnOnce() -> String) -> Self {
        match self {
            Self::Server { status: 404, .. } => Self::NotFound {
                resource: resource(),
            },
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn detail(&self) -> String {
        match self {
            Self::Server { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
