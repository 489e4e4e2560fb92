use pathways_schema::ApiErrorBody;
use reqwest::StatusCode;

use crate::error::ClientError;
use crate::utils::logging::{body_preview, with_pretty_json_debug};

/// Passes successful responses through and turns 4xx/5xx into typed errors.
///
/// The 401 case is handled by the client before this is reached.
pub(crate) async fn into_result(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(resp);
    }

    let bytes = resp.bytes().await.unwrap_or_default();
    let body = ApiErrorBody::from_bytes(&bytes);

    if serde_json::from_slice::<serde_json::Value>(&bytes).is_ok() {
        with_pretty_json_debug(&body, |pretty_body| {
            tracing::debug!(%status, body = %pretty_body, "API structured error");
        });
    } else {
        tracing::debug!(%status, body = %body_preview(&bytes), "API unstructured error");
    }

    Err(classify(status, body))
}

pub(crate) fn classify(status: StatusCode, body: ApiErrorBody) -> ClientError {
    if status.is_server_error() {
        ClientError::Server { status, body }
    } else {
        ClientError::Validation { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_status_class() {
        assert!(matches!(
            classify(StatusCode::BAD_REQUEST, ApiErrorBody::default()),
            ClientError::Validation { .. }
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, ApiErrorBody::default()),
            ClientError::Validation { .. }
        ));
        assert!(matches!(
            classify(StatusCode::SERVICE_UNAVAILABLE, ApiErrorBody::default()),
            ClientError::Server { .. }
        ));
    }
}
