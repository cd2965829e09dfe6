/*
 * Responsibility
 * - /news, /news/mock の forwarding (認証不要)
 * - query と client 提示の X-API-KEY だけを passthrough する
 * - このルート群だけは upstream エラーも envelope に包む (歴史的な client 契約)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::state::AppState;

pub async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    inbound: HeaderMap,
) -> Response {
    let path = state.news_path.clone();
    forward_news(&state, &path, params, &inbound, "NEWS_UPSTREAM_ERROR").await
}

pub async fn mock_news(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    inbound: HeaderMap,
) -> Response {
    forward_news(
        &state,
        "/api/news/nba-mock",
        params,
        &inbound,
        "NEWS_MOCK_UPSTREAM_ERROR",
    )
    .await
}

async fn forward_news(
    state: &AppState,
    path: &str,
    params: Vec<(String, String)>,
    inbound: &HeaderMap,
    error_code: &str,
) -> Response {
    // No bearer on these routes; only the client's own API key crosses over.
    let mut headers = HeaderMap::new();
    if let Some(key) = inbound.get("x-api-key") {
        headers.insert("x-api-key", key.clone());
    }

    match state.upstream.get(path, headers, &params).await {
        Ok(upstream) if upstream.is_success() => upstream.into_response(),
        Ok(upstream) => {
            let detail = serde_json::from_slice::<Value>(&upstream.body)
                .unwrap_or_else(|_| Value::String(upstream.body_utf8_lossy()));
            (
                upstream.status,
                Json(json!({ "ok": false, "error": error_code, "detail": detail })),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": error_code, "detail": err.to_string() })),
        )
            .into_response(),
    }
}
