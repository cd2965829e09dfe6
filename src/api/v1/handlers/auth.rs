/*
 * Responsibility
 * - POST /auth/login: JSON body をそのまま upstream に渡す (このルートだけ認証不要)
 * - 静的 API key があればヘッダに載せる。client のヘッダは転送しない
 */
use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::AppError;
use crate::services::upstream::UpstreamResponse;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(None);
    let response = state
        .upstream
        .post_json("/api/auth/login", headers, &body)
        .await?;

    // Status and body reflect the upstream verbatim, success or not.
    Ok(response)
}
