use pathways_schema::{ApiErrorBody, KnownFailure};
use reqwest::StatusCode;
use thiserror::Error as ThisError;

use super::IsRetryable;
use super::auth::AuthError;
use super::store::StoreError;

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request did not complete within the configured timeout, after all retries.
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Connection-level failure (DNS, refused, reset), after all retries.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// 4xx pass-through (other than the handled 401).
    #[error("Request rejected with status {status}")]
    Validation { status: StatusCode, body: ApiErrorBody },

    /// 5xx pass-through.
    #[error("Server error with status {status}")]
    Server { status: StatusCode, body: ApiErrorBody },

    /// 2xx response whose payload reported `success: false`.
    #[error("Request reported failure: {}", .body.message.as_deref().unwrap_or("<no message>"))]
    Rejected { body: ApiErrorBody },

    /// Caught locally before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    #[error("HTTP request error: {0}")]
    Reqwest(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e)
        } else if e.is_connect() || (e.is_request() && e.status().is_none()) {
            ClientError::Network(e)
        } else {
            ClientError::Reqwest(e)
        }
    }
}

impl IsRetryable for ClientError {
    fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::Network(_))
    }
}

impl ClientError {
    /// Pass-through status, if the error came from an HTTP response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Validation { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            ClientError::Auth(AuthError::RefreshFailed { status, .. }) => *status,
            ClientError::Auth(AuthError::Rejected) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    /// Server-provided error body, if any.
    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            ClientError::Validation { body, .. }
            | ClientError::Server { body, .. }
            | ClientError::Rejected { body } => Some(body),
            _ => None,
        }
    }

    /// Text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Auth(auth) => auth.event_message().to_string(),
            ClientError::Timeout(_) => {
                "Request timed out. Please check your connection and try again.".to_string()
            }
            ClientError::Network(_) => {
                "Network error. Please check your internet connection.".to_string()
            }
            ClientError::Validation { body, .. } => body
                .joined_errors()
                .or_else(|| body.message.clone())
                .unwrap_or_else(|| "Invalid quiz data.".to_string()),
            ClientError::Server { body, .. } => known_failure_message(body)
                .unwrap_or("Server error occurred. Please try again later.")
                .to_string(),
            ClientError::Rejected { body } => known_failure_message(body)
                .map(str::to_string)
                .or_else(|| body.message.clone())
                .unwrap_or_else(|| "Something went wrong. Please try again.".to_string()),
            ClientError::InvalidRequest(reason) => (*reason).to_string(),
            ClientError::Reqwest(_)
            | ClientError::Json(_)
            | ClientError::Url(_)
            | ClientError::Store(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

fn known_failure_message(body: &ApiErrorBody) -> Option<&'static str> {
    body.known_failure().map(|failure| match failure {
        KnownFailure::Database => "Failed to save your quiz responses. Please try again.",
        KnownFailure::Gemini => {
            "AI analysis is temporarily unavailable. Your quiz was saved, but recommendations may not be available."
        }
        KnownFailure::InvalidRequestBody => "Invalid quiz data.",
    })
}
