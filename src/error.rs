/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - upstream / storage / 認証エラーを統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::storage::StorageError;
use crate::services::upstream::UpstreamError;

/// Client-facing envelope: `{ "error": <message> }`.
///
/// Upstream responses that completed (2xx or not) are NOT wrapped in this —
/// they pass through verbatim. This envelope is only for failures the
/// gateway itself produces.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bearer token required in Authorization header")]
    MissingCredential,

    #[error("bearer token is not decodable")]
    UndecodableCredential,

    #[error("bearer token failed verification")]
    InvalidCredential,

    #[error("{0}")]
    InvalidInput(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("storage upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingCredential
            | AppError::UndecodableCredential
            | AppError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // Transport-level failures: no upstream status exists, synthesize 500.
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
