use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode the payload JSON ("claims") from a JWT.
///
/// Signature-agnostic: the payload segment is base64url-decoded and parsed, nothing is verified.
pub(crate) fn decode_jwt_claims(jwt: &str) -> Option<Value> {
    let payload_b64 = jwt.split('.').nth(1)?;

    // Most JWTs are base64url without padding, but some toolchains may include padding.
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE.decode(payload_b64))
        .ok()?;

    serde_json::from_slice(&bytes).ok()
}

/// `exp` claim of a JWT as a UTC timestamp.
pub(crate) fn jwt_expiry(jwt: &str) -> Option<DateTime<Utc>> {
    decode_jwt_claims(jwt)?
        .get("exp")
        .and_then(Value::as_i64)
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
}
