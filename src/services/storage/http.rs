/*
 * Responsibility
 * - リモート object storage への streamed upload (multipart POST 1 回)
 * - 資格情報は StorageConfig 経由で注入 (プロセス全体の static 初期化はしない)
 * - provider エラーはそのまま再送出し、client-facing の形は handler が決める
 */
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderValue;
use serde::Deserialize;
use url::Url;

use super::store::{ObjectStorage, StorageError, StorageReference};

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_url: Url,
    pub api_key: String,
    /// Provider-side namespace the uploads land in.
    pub folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    secure_url: String,
}

pub struct HttpStorageClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: Option<HeaderValue>,
    folder: String,
}

impl std::fmt::Debug for HttpStorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the API key
        f.debug_struct("HttpStorageClient")
            .field("upload_url", &self.upload_url)
            .field("folder", &self.folder)
            .finish()
    }
}

impl HttpStorageClient {
    pub fn new(config: &StorageConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            upload_url: config.upload_url.as_str().to_string(),
            api_key: HeaderValue::from_str(&config.api_key).ok(),
            folder: config.folder.clone(),
        })
    }
}

#[async_trait]
impl ObjectStorage for HttpStorageClient {
    async fn upload(
        &self,
        buffer: Vec<u8>,
        public_id: &str,
    ) -> Result<StorageReference, StorageError> {
        let file = reqwest::multipart::Part::bytes(buffer).file_name(public_id.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("public_id", public_id.to_string())
            .text("folder", self.folder.clone());

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.clone());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Provider { status, message });
        }

        let reply: UploadReply = response.json().await?;

        Ok(StorageReference {
            secure_url: reply.secure_url,
        })
    }
}
