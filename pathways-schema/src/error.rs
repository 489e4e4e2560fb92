use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Error payload returned by the API: `{ success: false, message, errors? }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Field-level validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default)]
    pub message: String,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// Failure messages the quiz backend is documented to return verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownFailure {
    /// `"Database error"`: the submission could not be persisted.
    Database,
    /// `"Gemini error"`: the AI analysis step failed.
    Gemini,
    /// `"Invalid request body"`.
    InvalidRequestBody,
}

impl KnownFailure {
    pub fn from_message(message: &str) -> Option<Self> {
        match message {
            "Database error" => Some(Self::Database),
            "Gemini error" => Some(Self::Gemini),
            "Invalid request body" => Some(Self::InvalidRequestBody),
            _ => None,
        }
    }
}

impl ApiErrorBody {
    /// Builds a body from raw bytes; unstructured payloads become `{ message: <text> }`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if let Ok(body) = serde_json::from_slice::<Self>(bytes) {
            return body;
        }
        let text = String::from_utf8_lossy(bytes).trim().to_string();
        Self {
            message: (!text.is_empty()).then_some(text),
            ..Self::default()
        }
    }

    pub fn known_failure(&self) -> Option<KnownFailure> {
        self.message.as_deref().and_then(KnownFailure::from_message)
    }

    /// Validation messages joined with `", "`, if any were returned.
    pub fn joined_errors(&self) -> Option<String> {
        let messages: Vec<&str> = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect();
        (!messages.is_empty()).then(|| messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_failure_messages() {
        let body = ApiErrorBody::from_bytes(br#"{"success": false, "message": "Gemini error"}"#);
        assert_eq!(body.success, Some(false));
        assert_eq!(body.known_failure(), Some(KnownFailure::Gemini));

        let body = ApiErrorBody::from_bytes(br#"{"message": "Database error"}"#);
        assert_eq!(body.known_failure(), Some(KnownFailure::Database));
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let body = ApiErrorBody::from_bytes(b"Bad Gateway\n");
        assert_eq!(body.message.as_deref(), Some("Bad Gateway"));
        assert!(body.known_failure().is_none());

        let empty = ApiErrorBody::from_bytes(b"");
        assert!(empty.message.is_none());
    }

    #[test]
    fn joins_validation_errors() {
        let raw = br#"{"errors": [
            {"field": "responses", "message": "responses is required"},
            {"message": ""},
            {"field": "quizType", "message": "quizType is invalid"}
        ]}"#;
        let body = ApiErrorBody::from_bytes(raw);
        assert_eq!(
            body.joined_errors().as_deref(),
            Some("responses is required, quizType is invalid")
        );
    }
}
