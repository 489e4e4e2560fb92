use pathways_schema::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ApiClient, ApiRequest};
use crate::error::{AuthError, ClientError};
use crate::store::Credentials;

const REGISTER_PATH: &str = "/api/users/register";
const LOGIN_PATH: &str = "/api/users/login";
const PROFILE_PATH: &str = "/api/users/profile";

impl ApiClient {
    /// Creates an account. The caller logs in separately afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ClientError> {
        let req = ApiRequest::post(REGISTER_PATH).anonymous().json(request)?;
        self.send_json(req).await
    }

    /// Logs in and persists the issued tokens and, when present, the user record.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let req = ApiRequest::post(LOGIN_PATH).anonymous().json(&body)?;
        let resp: LoginResponse = self.send_json(req).await?;

        let pair = resp.token_pair().ok_or(AuthError::MissingTokens)?;
        let credentials = Credentials::from_pair(pair, None);
        self.store().save(&credentials).await?;
        if let Some(user) = resp.user.as_ref() {
            self.store().save_user(user).await?;
        }

        info!(
            user_id = resp.user.as_ref().and_then(|u| u.id.as_deref()).unwrap_or("<unknown>"),
            expires_at = ?credentials.access_expires_at(),
            "Logged in"
        );
        Ok(resp)
    }

    /// Forgets tokens and the cached user record.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.store().clear().await?;
        debug!("Logged out");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.store().load().await?.is_some())
    }

    /// User record cached at login, without a network call.
    pub async fn current_user(&self) -> Result<Option<UserProfile>, ClientError> {
        Ok(self.store().load_user().await?)
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let value: Value = self.send_json(ApiRequest::get(PROFILE_PATH)).await?;
        let user = profile_from(value)?;
        self.store().save_user(&user).await?;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &UserProfile) -> Result<UserProfile, ClientError> {
        let req = ApiRequest::put(PROFILE_PATH).json(update)?;
        let value: Value = self.send_json(req).await?;
        let user = profile_from(value)?;
        self.store().save_user(&user).await?;
        Ok(user)
    }
}

/// Accepts `{ "user": {...} }`, `{ "data": {...} }` or a bare user object.
fn profile_from(mut value: Value) -> Result<UserProfile, serde_json::Error> {
    for key in ["user", "data"] {
        if let Some(inner) = value.get_mut(key).filter(|v| v.is_object()) {
            return serde_json::from_value(inner.take());
        }
    }
    serde_json::from_value(value)
}
