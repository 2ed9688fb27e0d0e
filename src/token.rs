//! Bearer token inspection
//!
//! Tokens are decoded without verifying the signature: the client only needs
//! the expiry to decide whether to refresh, the backend does the verifying.

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Claims carried in the token payload
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Every other claim, as sent
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawClaims {
    exp: Number,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Decode the payload segment of a `header.payload.signature` token
pub fn decode_claims(token: &str) -> Result<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClientError::TokenDecode(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| ClientError::TokenDecode(format!("invalid base64url payload: {e}")))?;

    let raw: RawClaims = serde_json::from_slice(&payload)
        .map_err(|e| ClientError::TokenDecode(format!("invalid claims: {e}")))?;

    // Fractional expiries are floored; against a whole-second clock the
    // comparison result is unchanged.
    let exp = raw
        .exp
        .as_i64()
        .or_else(|| raw.exp.as_f64().map(|f| f.floor() as i64))
        .ok_or_else(|| ClientError::TokenDecode("exp is out of range".to_string()))?;

    Ok(Claims {
        exp,
        extra: raw.extra,
    })
}

/// Whether the token is expired at `now` (seconds since epoch).
///
/// Undecodable tokens count as expired.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp < now,
        Err(_) => true,
    }
}

/// Whether the token is expired right now
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_secs())
}

pub(crate) fn now_secs() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
pub(crate) fn make_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_750_000_000;

    #[test]
    fn test_past_exp_is_expired() {
        for delta in [1, 10, 3600, NOW] {
            let token = make_token(&json!({ "exp": NOW - delta, "id": "u1" }));
            assert!(is_expired_at(&token, NOW), "delta {delta}");
        }
    }

    #[test]
    fn test_future_exp_is_valid() {
        for delta in [0, 1, 10, 3600] {
            let token = make_token(&json!({ "exp": NOW + delta }));
            assert!(!is_expired_at(&token, NOW), "delta {delta}");
        }
    }

    #[test]
    fn test_fractional_exp() {
        let token = make_token(&json!({ "exp": (NOW as f64) - 0.5 }));
        assert!(is_expired_at(&token, NOW));

        let token = make_token(&json!({ "exp": (NOW as f64) + 0.5 }));
        assert!(!is_expired_at(&token, NOW));
    }

    #[test]
    fn test_malformed_tokens_fail_closed() {
        let far_future = make_token(&json!({ "exp": NOW + 3600 }));
        let (header, rest) = far_future.split_once('.').unwrap();
        let (_, sig) = rest.split_once('.').unwrap();

        let cases = [
            "not-a-jwt".to_string(),
            String::new(),
            "a.b".to_string(),
            format!("{header}.!!!.{sig}"),
            format!("{header}.{}.{sig}", URL_SAFE_NO_PAD.encode("plain text")),
            make_token(&json!({ "sub": "u1" })),
            make_token(&json!({ "exp": "tomorrow" })),
            format!("{far_future}.extra"),
        ];

        for token in cases {
            assert!(is_expired_at(&token, NOW), "token {token:?}");
        }
    }

    #[test]
    fn test_decode_claims_keeps_other_claims() {
        let token = make_token(&json!({ "exp": NOW, "id": "u1", "iat": NOW - 900 }));
        let claims = decode_claims(&token).unwrap();

        assert_eq!(claims.exp, NOW);
        assert_eq!(claims.extra.get("id"), Some(&json!("u1")));
        assert_eq!(claims.extra.get("iat"), Some(&json!(NOW - 900)));
    }

    #[test]
    fn test_padded_payload_decodes() {
        let token = make_token(&json!({ "exp": NOW + 60 }));
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push_str("==");
        assert!(!is_expired_at(&parts.join("."), NOW));
    }

    #[test]
    fn test_is_expired_uses_wall_clock() {
        let stale = make_token(&json!({ "exp": now_secs() - 10 }));
        let fresh = make_token(&json!({ "exp": now_secs() + 3600 }));
        assert!(is_expired(&stale));
        assert!(!is_expired(&fresh));
    }
}
