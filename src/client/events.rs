use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Name of the event published when the session is lost for good.
pub const AUTH_ERROR_EVENT: &str = "auth-error";

/// Payload of the `auth-error` event. Subscribers typically send the user to a login view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthErrorEvent {
    pub message: String,
}

impl AuthErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        AUTH_ERROR_EVENT
    }
}

const EVENT_CAPACITY: usize = 16;

pub(crate) fn channel() -> broadcast::Sender<AuthErrorEvent> {
    broadcast::channel(EVENT_CAPACITY).0
}
