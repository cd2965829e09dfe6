//! Signature-checking stage of the auth context.
//!
//! [`VerifiedClaims`] can only be obtained through [`TokenVerifier::verify`],
//! which checks signature, `exp`, `iss` and `aud` against the configured
//! key. Code that makes an authorization decision must take
//! `VerifiedClaims`, never `UnverifiedClaims`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::VerificationConfig;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

/// Raw claim shape as deserialized from the token.
///
/// NOTE:
/// - `aud` can be either string or array; jsonwebtoken validates it via
///   `Validation::set_audience`, so we do not keep it here.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    exp: u64,

    #[serde(default)]
    roles: Option<Vec<String>>,
}

/// Claims that passed signature + iss/aud/exp validation.
#[derive(Clone, Debug)]
pub struct VerifiedClaims {
    pub subject: String,
    pub expires_at: u64,
    pub roles: Option<Vec<String>>,
}

/// RS256 access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(config: &VerificationConfig) -> Result<Self, VerifyError> {
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature and registered claims, then lift into the
    /// application-facing type.
    ///
    /// `jsonwebtoken::Validation` already checks signature, `exp`, `iss`
    /// and `aud` (because we set them); this additionally rejects an empty
    /// `sub`.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, VerifyError> {
        let data =
            jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(VerifyError::EmptyClaim("exp"));
        }

        Ok(VerifiedClaims {
            subject: claims.sub,
            expires_at: claims.exp,
            roles: claims.roles,
        })
    }
}
