pub mod claims;
pub mod verifier;

pub use claims::{ClaimsError, UnverifiedClaims};
pub use verifier::{TokenVerifier, VerifiedClaims, VerifyError};
