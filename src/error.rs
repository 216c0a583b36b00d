//! Error types shared by the client, the collection service and the AI requester.

use thiserror::Error;

/// Errors returned by [`crate::api::client::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, reset, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request did not complete within its deadline
    #[error("request timed out")]
    Timeout,

    /// The service answered 503: its storage is not reachable
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The service rejected the payload (400)
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Status {
                status: err.status().map(|s| s.as_u16()).unwrap_or(200),
                message: format!("undecodable body: {err}"),
            }
        } else {
            Self::Http(err)
        }
    }
}

impl ApiError {
    /// Map a non-success HTTP status and its error message to a variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::Invalid(message),
            404 => Self::NotFound(message),
            503 => Self::Unavailable(message),
            _ => Self::Status { status, message },
        }
    }

    /// HTTP status if the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Invalid(_) => Some(400),
            Self::NotFound(_) => Some(404),
            Self::Unavailable(_) => Some(503),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the service could not be reached or could not serve data.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout | Self::Unavailable(_))
    }
}

/// Errors from the SQLite-backed stores (server collection and client snapshot).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("contact not found: {0}")]
    NotFound(String),
}

/// Failures while asking the generative model for an insight. These never
/// reach the UI; [`crate::insight::InsightClient::analyze`] degrades them.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("response does not match the insight schema: {0}")]
    Schema(String),
}

/// Rejected contact input. Checked before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,

    #[error("Address is required.")]
    MissingAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Bootstrap has not resolved yet
    #[error("contacts are still loading")]
    NotReady,

    /// An add or delete is still waiting on its result
    #[error("another change is still in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
