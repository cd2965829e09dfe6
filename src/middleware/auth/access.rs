//! Bearer 抽出 → unverified decode → (設定があれば) 署名検証 → AuthCtx を extensions に入れる
//!
//! The decoded claims are a propagation/logging view only. When a
//! verification key is configured the token additionally has to pass
//! `TokenVerifier::verify`; without one, the gateway forwards the
//! credential as-is and the upstream remains the authority.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::UnverifiedClaims;
use crate::state::AppState;

/// 認証が必要な範囲に middleware を適用する。
///
/// 例：
/// ```ignore
/// let referee = referee_routes();
/// let referee = middleware::auth::access::apply(referee, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::MissingCredential)?;

    let token = auth
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingCredential)?;

    let claims = match UnverifiedClaims::decode(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = ?err, "bearer token not decodable");
            return Err(AppError::UndecodableCredential);
        }
    };

    if let Some(verifier) = &state.verifier
        && let Err(err) = verifier.verify(token)
    {
        tracing::warn!(error = ?err, "bearer token failed verification");
        return Err(AppError::InvalidCredential);
    }

    tracing::debug!(subject = claims.subject().unwrap_or("<none>"), "bearer accepted");

    // middleware → extractor への受け渡し。raw credential は header 値そのまま。
    let auth_ctx = AuthCtx::new(auth.to_string(), claims);
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
