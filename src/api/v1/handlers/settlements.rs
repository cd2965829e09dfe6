/*
 * Responsibility
 * - /referee/settlements の forwarding (list / PDF ダウンロード)
 * - PDF は binary passthrough。エラーが text で返ってきた場合だけ JSON に包む
 *   (client に生バイトのエラーページを渡さない)
 */
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::services::upstream::UpstreamResponse;
use crate::state::AppState;

pub async fn list_settlements(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<UpstreamResponse, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    Ok(state
        .upstream
        .get("/api/arbitro/liquidaciones", headers, &[])
        .await?)
}

pub async fn settlement_pdf(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let headers = state.upstream.forward_headers(Some(auth.authorization()));
    let upstream = state
        .upstream
        .get(
            &format!("/api/arbitro/liquidaciones/{id}/pdf"),
            headers,
            &[],
        )
        .await?;

    if upstream.is_success() {
        // Content type reflects the upstream; `application/pdf` only as the
        // defensive default when upstream sent none.
        let content_type = upstream
            .content_type
            .clone()
            .unwrap_or_else(|| HeaderValue::from_static("application/pdf"));

        let mut response = Response::new(Body::from(upstream.body));
        *response.status_mut() = upstream.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
        response.headers_mut().insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("inline; filename=settlement.pdf"),
        );
        return Ok(response);
    }

    if upstream.is_text() {
        let message = upstream.body_utf8_lossy();
        return Ok((upstream.status, Json(json!({ "error": message }))).into_response());
    }

    Ok(upstream.into_response())
}
