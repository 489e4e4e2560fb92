//! Persisted session state: the credential pair and the cached user record.
//!
//! The on-disk document uses the browser storage key names (`accessToken`, `refreshToken`,
//! `userData`) so a session exported from the web client can be reused as is. Legacy builds
//! stored a single `token` or `authToken`; those are read as an access token without a refresh
//! token and are dropped on the next save.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pathways_schema::{TokenPair, UserProfile};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::StoreError;
use crate::utils::jwt::jwt_expiry;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Credentials from a freshly issued pair; keeps `previous_refresh` if the server did not
    /// rotate the refresh token.
    pub(crate) fn from_pair(pair: TokenPair, previous_refresh: Option<String>) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair
                .refresh_token
                .filter(|t| !t.trim().is_empty())
                .or(previous_refresh),
        }
    }

    /// `exp` claim of the access token, when it is a readable JWT.
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        jwt_expiry(&self.access_token)
    }
}

// Tokens never reach logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Storage for the session of one API client.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<Credentials>, StoreError>;

    /// Replaces the stored credential pair wholesale.
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError>;

    async fn load_user(&self) -> Result<Option<UserProfile>, StoreError>;

    async fn save_user(&self, user: &UserProfile) -> Result<(), StoreError>;

    /// Removes both tokens, keeping `userData`.
    async fn clear_tokens(&self) -> Result<(), StoreError>;

    /// Removes tokens and `userData` (logout).
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Storage document shared by the in-memory and file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub(crate) struct SessionDocument {
    #[serde(
        default,
        rename = "accessToken",
        skip_serializing_if = "Option::is_none"
    )]
    access_token: Option<String>,

    #[serde(
        default,
        rename = "refreshToken",
        skip_serializing_if = "Option::is_none"
    )]
    refresh_token: Option<String>,

    /// Browser storage holds this as a JSON string; both forms are accepted.
    #[serde(
        default,
        rename = "userData",
        deserialize_with = "deserialize_user_lax",
        skip_serializing_if = "Option::is_none"
    )]
    user_data: Option<UserProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,

    #[serde(default, rename = "authToken", skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, Value>,
}

fn deserialize_user_lax<'de, D>(deserializer: D) -> Result<Option<UserProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    // A broken cached user must not make the stored tokens unreadable.
    let parsed = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::String(raw) if raw.trim().is_empty() => return Ok(None),
        Value::String(raw) => serde_json::from_str::<UserProfile>(&raw),
        other => serde_json::from_value::<UserProfile>(other),
    };
    Ok(parsed
        .inspect_err(|e| warn!(error = %e, "Ignoring unreadable userData"))
        .ok())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl SessionDocument {
    pub(crate) fn credentials(&self) -> Option<Credentials> {
        if let Some(access_token) = non_empty(self.access_token.as_deref()) {
            return Some(Credentials {
                access_token,
                refresh_token: non_empty(self.refresh_token.as_deref()),
            });
        }

        non_empty(self.token.as_deref())
            .or_else(|| non_empty(self.auth_token.as_deref()))
            .map(|access_token| Credentials {
                access_token,
                refresh_token: None,
            })
    }

    pub(crate) fn set_credentials(&mut self, credentials: &Credentials) {
        self.access_token = Some(credentials.access_token.clone());
        self.refresh_token.clone_from(&credentials.refresh_token);
        self.token = None;
        self.auth_token = None;
    }

    pub(crate) fn user(&self) -> Option<UserProfile> {
        self.user_data.clone()
    }

    pub(crate) fn set_user(&mut self, user: &UserProfile) {
        self.user_data = Some(user.clone());
    }

    pub(crate) fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.token = None;
        self.auth_token = None;
    }

    pub(crate) fn clear(&mut self) {
        self.clear_tokens();
        self.user_data = None;
    }
}
