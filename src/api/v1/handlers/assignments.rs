/*
 * Responsibility
 * - /referee/assignments 系 forwarding (list / accept / reject)
 * - body なしの POST。path param 以外に渡すものはない
 */
use axum::extract::{Path, State};

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::services::upstream::UpstreamResponse;
use crate::state::AppState;

pub async fn list_assignments(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state
        .upstream
        .get("/api/arbitro/asignaciones", headers, &[])
        .await?)
}

pub async fn accept_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state
        .upstream
        .post_empty(&format!("/api/arbitro/asignaciones/{id}/aceptar"), headers)
        .await?)
}

pub async fn reject_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state
        .upstream
        .post_empty(&format!("/api/arbitro/asignaciones/{id}/rechazar"), headers)
        .await?)
}
