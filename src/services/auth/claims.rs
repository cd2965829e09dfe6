//! Unverified bearer-token claims.
//!
//! Responsibility:
//! - トークンの payload segment を base64url デコードするだけ (署名検証はしない)
//! - 表示・ログ・propagation 専用の view を提供する
//!
//! This type is deliberately named `UnverifiedClaims`: nothing here proves
//! the token is authentic, so it must never drive an authorization
//! decision. Anything authorization-shaped goes through
//! [`crate::services::auth::TokenVerifier`] instead.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token does not have a payload segment")]
    Malformed,

    #[error("token payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Claims decoded without signature verification.
///
/// Presence of claims does NOT imply the token is trustworthy — a forged
/// token decodes just as well as a real one.
#[derive(Clone, Debug)]
pub struct UnverifiedClaims(Map<String, Value>);

impl UnverifiedClaims {
    /// Best-effort decode of the payload segment of `token` (the part
    /// between the first and second dot).
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let payload = token.split('.').nth(1).ok_or(ClaimsError::Malformed)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload)?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(ClaimsError::NotAnObject),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn decodes_payload_without_verifying() {
        let token = token_with_payload(r#"{"sub":"referee-1","name":"Ana"}"#);
        let claims = UnverifiedClaims::decode(&token).unwrap();

        assert_eq!(claims.subject(), Some("referee-1"));
        assert_eq!(claims.get("name").and_then(Value::as_str), Some("Ana"));
    }

    #[test]
    fn forged_signature_still_decodes() {
        // The whole point of this type: no signature check.
        let token = token_with_payload(r#"{"sub":"anyone"}"#);
        let forged = format!("{}.definitely-not-a-signature", token.rsplit_once('.').unwrap().0);

        assert_eq!(
            UnverifiedClaims::decode(&forged).unwrap().subject(),
            Some("anyone")
        );
    }

    #[test]
    fn rejects_token_without_segments() {
        assert!(matches!(
            UnverifiedClaims::decode("no-dots-here"),
            Err(ClaimsError::Malformed)
        ));
    }

    #[test]
    fn rejects_non_base64_payload() {
        assert!(matches!(
            UnverifiedClaims::decode("a.$$$.c"),
            Err(ClaimsError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_non_object_payload() {
        let token = token_with_payload(r#""just a string""#);
        assert!(matches!(
            UnverifiedClaims::decode(&token),
            Err(ClaimsError::NotAnObject)
        ));
    }
}
