//! Outbound HTTP client for the upstream domain service.
//!
//! Responsibility:
//! - ひとつの長寿命 reqwest::Client を base URL + timeout 付きで保持する
//! - per-call のヘッダ注入・query passthrough・binary response mode を提供する
//! - リトライはしない。1 回の呼び出し = 1 回の試行。失敗は即座に handler に伝播する
//!
//! A completed exchange (any status, 2xx or not) is an [`UpstreamResponse`];
//! only transport-level failures (timeout, connect, body read) become
//! [`UpstreamError`]. Handlers reflect completed exchanges verbatim and map
//! transport failures to a synthesized error envelope.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use url::Url;

/// Injected at construction time; no hidden process-wide defaults.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub base_url: Url,
    /// Static service-to-service key sent as `X-API-KEY` when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(err)
    } else if err.is_connect() {
        UpstreamError::Unreachable(err)
    } else {
        UpstreamError::Transport(err)
    }
}

/// A fully-buffered upstream exchange. The body is kept as raw bytes so
/// binary endpoints survive untouched; JSON endpoints just reflect the
/// bytes with the upstream's own content type.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the upstream declared a textual body (used by binary routes
    /// to avoid handing raw bytes to the client as an error page).
    pub fn is_text(&self) -> bool {
        self.content_type
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("text"))
    }

    pub fn body_utf8_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for UpstreamResponse {
    // Verbatim reflection: status + content type + body, nothing else.
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(ct) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, ct);
        }
        response
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<HeaderValue>,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the API key
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let api_key = config
            .api_key
            .as_deref()
            .and_then(|key| HeaderValue::from_str(key).ok());

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Headers the gateway is allowed to forward: the client's own bearer
    /// credential plus the configured static API key. Nothing else ever
    /// crosses to the upstream.
    pub fn forward_headers(&self, authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = authorization
            && let Ok(value) = HeaderValue::from_str(auth)
        {
            headers.insert(header::AUTHORIZATION, value);
        }
        if let Some(key) = &self.api_key {
            headers.insert("x-api-key", key.clone());
        }
        headers
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(
        &self,
        path: &str,
        headers: HeaderMap,
        query: &[(String, String)],
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self
            .http
            .get(self.endpoint(path))
            .headers(headers)
            .query(query);
        self.send(request).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self
            .http
            .post(self.endpoint(path))
            .headers(headers)
            .json(body);
        self.send(request).await
    }

    /// POST with no body (upstream action endpoints take everything from
    /// the path and headers).
    pub async fn post_empty(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.http.post(self.endpoint(path)).headers(headers);
        self.send(request).await
    }

    pub async fn put_multipart(
        &self,
        path: &str,
        headers: HeaderMap,
        form: reqwest::multipart::Form,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self
            .http
            .put(self.endpoint(path))
            .headers(headers)
            .multipart(form);
        self.send(request).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let response = request.send().await.map_err(classify)?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        // Buffer fully; binary endpoints need the exact bytes.
        let body = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
