//! Object-storage interface used by upload-bearing routes.
use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Storage-layer errors.
///
/// Note:
/// - Kept independent from `AppError` so callers decide the client-facing
///   shape. Provider errors carry the provider's status and message
///   verbatim; nothing is swallowed here.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storage provider rejected upload ({status}): {message}")]
    Provider { status: StatusCode, message: String },
}

/// Durable reference to an uploaded object. Immutable once produced.
#[derive(Clone, Debug)]
pub struct StorageReference {
    pub secure_url: String,
}

/// A minimal storage interface.
///
/// Intentionally small: the gateway only ever performs one streamed upload
/// per request and folds the resulting URL into the forwarded body. Size
/// limiting happens at the HTTP boundary (request body limit), never here.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    // Upload a buffer under `public_id`. One attempt; no retry.
    async fn upload(
        &self,
        buffer: Vec<u8>,
        public_id: &str,
    ) -> Result<StorageReference, StorageError>;
}
