use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Terminal authentication failures. Every variant ends the current session.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum AuthError {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Token refresh failed: {message}")]
    RefreshFailed {
        status: Option<StatusCode>,
        message: String,
    },

    /// The request was still unauthorized after replaying it with a refreshed token.
    #[error("Request unauthorized after token refresh")]
    Rejected,

    #[error("Login response did not include tokens")]
    MissingTokens,
}

impl AuthError {
    pub(crate) fn refresh_failed(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            status,
            message: message.into(),
        }
    }

    /// Message carried by the `auth-error` event for this failure.
    pub fn event_message(&self) -> &'static str {
        match self {
            AuthError::MissingRefreshToken | AuthError::MissingTokens => "Please log in again",
            AuthError::RefreshFailed { .. } | AuthError::Rejected => {
                "Session expired, please log in again"
            }
        }
    }
}
