//! Authenticated HTTP client for the Pathways API.
//!
//! Every call goes through [`ApiClient::send`], which:
//! - attaches the stored access token as a bearer credential,
//! - retries timeouts and connection failures with linear backoff,
//! - on a 401, refreshes the access token once (single-flight across concurrent callers) and
//!   replays the request,
//! - ends the session and publishes an `auth-error` event when the refresh cannot succeed.

mod backoff;
mod events;
mod policy;
mod refresh;
mod request;

pub use backoff::{LinearBackoff, LinearBuilder};
pub use events::{AUTH_ERROR_EVENT, AuthErrorEvent};
pub use request::ApiRequest;

use backon::Retryable;
use pathways_schema::{ApiErrorBody, LoginResponse, RefreshTokenRequest, TokenPair};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{Instrument, debug, error, info, info_span, warn};
use url::Url;

use crate::config::{ApiConfig, RetryConfig};
use crate::error::{AuthError, ClientError, IsRetryable};
use crate::store::{CredentialStore, Credentials};
use refresh::{RefreshCoordinator, RefreshTicket, wait_for};
use request::PendingRequest;

const REFRESH_PATH: &str = "/api/users/refresh-token";

/// One client per session. Share it behind an `Arc` when calls come from several tasks.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    retry_policy: LinearBuilder,
    store: Arc<dyn CredentialStore>,
    refresh: RefreshCoordinator,
    events: broadcast::Sender<AuthErrorEvent>,
}

impl ApiClient {
    pub fn new(
        api: &ApiConfig,
        retry: &RetryConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(api.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(api.connect_timeout())
            .timeout(api.timeout());

        if let Some(proxy_url) = api.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        let http = builder.build()?;

        info!(
            base_url = %api.base_url,
            timeout_ms = api.timeout_ms,
            proxy = %api.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
            max_retries = retry.max_retries,
            base_delay_ms = retry.base_delay_ms,
            "API client configured"
        );

        Ok(Self::with_http_client(
            http,
            api.base_url.clone(),
            retry,
            store,
        ))
    }

    /// Builds a client around an existing `reqwest::Client`; its timeouts apply as configured.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: Url,
        retry: &RetryConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            http,
            base_url,
            retry_policy: LinearBuilder::from(retry),
            store,
            refresh: RefreshCoordinator::default(),
            events: events::channel(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Receives an [`AuthErrorEvent`] each time the session is lost.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthErrorEvent> {
        self.events.subscribe()
    }

    /// Whether a token refresh is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_in_flight()
    }

    /// Requests currently parked behind the outstanding refresh.
    pub fn refresh_waiters(&self) -> usize {
        self.refresh.waiting()
    }

    /// Sends a request, returning any non-error response unchanged.
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, ClientError> {
        let mut pending = PendingRequest::new(request);
        let span = info_span!(
            "api_request",
            request_id = %pending.id,
            method = %pending.request.method(),
            path = %pending.request.path(),
        );
        self.send_pending(&mut pending).instrument(span).await
    }

    /// [`send`](Self::send), then decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let resp = self.send(request).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_pending(
        &self,
        pending: &mut PendingRequest,
    ) -> Result<reqwest::Response, ClientError> {
        let mut bearer = if pending.request.is_authenticated() {
            self.store.load().await?.map(|c| c.access_token)
        } else {
            None
        };

        loop {
            let resp = self.dispatch(pending, bearer.as_deref()).await?;
            let status = resp.status();

            if status != StatusCode::UNAUTHORIZED || !pending.request.is_authenticated() {
                debug!(%status, "API response");
                return policy::into_result(resp).await;
            }

            if !pending.mark_auth_retry() {
                warn!("Still unauthorized after token refresh");
                self.end_session(&AuthError::Rejected).await;
                return Err(AuthError::Rejected.into());
            }

            debug!("Unauthorized; recovering access token");
            bearer = Some(self.recover_access(bearer.as_deref()).await?);
        }
    }

    /// Sends once, retrying timeouts and connection failures with linear backoff.
    async fn dispatch(
        &self,
        pending: &PendingRequest,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        (|| async move {
            let req = pending.request.build(&self.http, &self.base_url, bearer)?;
            let resp = self.http.execute(req).await?;
            Ok::<_, ClientError>(resp)
        })
        .retry(self.retry_policy)
        .when(|err: &ClientError| err.is_retryable())
        .notify(|err, dur: Duration| {
            warn!(
                request_id = %pending.id,
                delay_ms = u64::try_from(dur.as_millis()).unwrap_or(u64::MAX),
                "Transient failure, retrying: {err}"
            );
        })
        .await
    }

    /// Produces an access token to replay a request that was answered with 401.
    ///
    /// `sent_with` is the token the failed attempt carried. If the stored token has changed
    /// since, another caller already refreshed and the request is simply replayed.
    async fn recover_access(&self, sent_with: Option<&str>) -> Result<String, ClientError> {
        let current = self.store.load().await?;
        if let Some(token) = rotated_since(current.as_ref(), sent_with) {
            debug!("Access token replaced since dispatch; replaying");
            return Ok(token);
        }

        if current.and_then(|c| c.refresh_token).is_none() {
            let err = AuthError::MissingRefreshToken;
            self.end_session(&err).await;
            return Err(err.into());
        }

        match self.refresh.join() {
            RefreshTicket::Waiter(rx) => {
                debug!("Token refresh in flight; waiting for it");
                Ok(wait_for(rx).await?)
            }
            RefreshTicket::Leader(leader) => {
                let outcome = self.lead_refresh(sent_with).await;
                let woken = leader.settle(&outcome);
                debug!(woken, ok = outcome.is_ok(), "Token refresh settled");
                Ok(outcome?)
            }
        }
    }

    /// Runs the refresh call while holding the single-flight lead.
    async fn lead_refresh(&self, sent_with: Option<&str>) -> Result<String, AuthError> {
        let result = self.try_refresh(sent_with).await;
        if let Err(err) = &result {
            self.end_session(err).await;
        }
        result
    }

    async fn try_refresh(&self, sent_with: Option<&str>) -> Result<String, AuthError> {
        let current = self.store.load().await.map_err(|e| {
            AuthError::refresh_failed(None, format!("failed to read stored credentials: {e}"))
        })?;

        // A refresh may have settled between our 401 and taking the lead.
        if let Some(token) = rotated_since(current.as_ref(), sent_with) {
            return Ok(token);
        }

        let refresh_token = current
            .and_then(|c| c.refresh_token)
            .ok_or(AuthError::MissingRefreshToken)?;

        info!("Refreshing access token");
        let pair = self.request_new_tokens(&refresh_token).await?;
        let credentials = Credentials::from_pair(pair, Some(refresh_token));
        self.store.save(&credentials).await.map_err(|e| {
            AuthError::refresh_failed(None, format!("failed to store refreshed tokens: {e}"))
        })?;

        info!(
            expires_at = ?credentials.access_expires_at(),
            "Access token refreshed"
        );
        Ok(credentials.access_token)
    }

    async fn request_new_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        let request = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .json(&body)
            .map_err(|e| AuthError::refresh_failed(None, e.to_string()))?;
        let pending = PendingRequest::new(request);

        let resp = self
            .dispatch(&pending, None)
            .await
            .map_err(|e| AuthError::refresh_failed(None, e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AuthError::refresh_failed(Some(status), e.to_string()))?;

        if !status.is_success() {
            let body = ApiErrorBody::from_bytes(&bytes);
            return Err(AuthError::refresh_failed(
                Some(status),
                body.message
                    .unwrap_or_else(|| format!("refresh endpoint returned {status}")),
            ));
        }

        let payload: LoginResponse = serde_json::from_slice(&bytes).map_err(|e| {
            AuthError::refresh_failed(Some(status), format!("invalid refresh response: {e}"))
        })?;
        payload.token_pair().ok_or_else(|| {
            AuthError::refresh_failed(
                Some(status),
                "refresh response did not include an access token",
            )
        })
    }

    /// Clears stored tokens and publishes the `auth-error` event for `cause`.
    async fn end_session(&self, cause: &AuthError) {
        if let Err(e) = self.store.clear_tokens().await {
            error!(error = %e, "Failed to clear stored credentials");
        }

        let event = AuthErrorEvent::new(cause.event_message());
        warn!(
            event = AUTH_ERROR_EVENT,
            message = %event.message,
            cause = %cause,
            "Authentication lost"
        );
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// The stored access token, if it differs from the one a failed attempt was sent with.
fn rotated_since(current: Option<&Credentials>, sent_with: Option<&str>) -> Option<String> {
    let current = current?;
    match sent_with {
        Some(sent) if sent == current.access_token => None,
        _ => Some(current.access_token.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_detected_only_for_a_different_token() {
        let creds = Credentials::new("a2", "r2");
        assert_eq!(rotated_since(Some(&creds), Some("a1")), Some("a2".to_string()));
        assert_eq!(rotated_since(Some(&creds), Some("a2")), None);
        assert_eq!(rotated_since(Some(&creds), None), Some("a2".to_string()));
        assert_eq!(rotated_since(None, Some("a1")), None);
    }
}
