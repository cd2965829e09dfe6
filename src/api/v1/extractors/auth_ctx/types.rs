use crate::services::auth::UnverifiedClaims;

/// Request-scoped bearer context, inserted by the access middleware.
///
/// `authorization` is the inbound header value verbatim (`Bearer <token>`)
/// and is what gets propagated upstream — it is never re-derived from the
/// claims, since those may be partially decoded or forged.
#[derive(Clone)]
pub struct AuthCtx {
    authorization: String,
    claims: UnverifiedClaims,
}

impl AuthCtx {
    pub fn new(authorization: String, claims: UnverifiedClaims) -> Self {
        Self {
            authorization,
            claims,
        }
    }

    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Display/propagation view only — see [`UnverifiedClaims`].
    pub fn claims(&self) -> &UnverifiedClaims {
        &self.claims
    }
}

impl std::fmt::Debug for AuthCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the raw credential
        f.debug_struct("AuthCtx")
            .field("subject", &self.claims.subject())
            .finish()
    }
}
