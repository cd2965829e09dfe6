/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - 初期化後は read-only。リクエスト間で共有するのは接続プールと設定だけ
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;
use crate::services::storage::ObjectStorage;
use crate::services::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub storage: Arc<dyn ObjectStorage>,
    /// Present only when a verification key is configured; without it the
    /// gateway runs in propagation-only mode.
    pub verifier: Option<Arc<TokenVerifier>>,
    pub news_path: String,
}

impl AppState {
    pub fn new(
        upstream: Arc<UpstreamClient>,
        storage: Arc<dyn ObjectStorage>,
        verifier: Option<Arc<TokenVerifier>>,
        news_path: String,
    ) -> Self {
        Self {
            upstream,
            storage,
            verifier,
            news_path,
        }
    }
}
