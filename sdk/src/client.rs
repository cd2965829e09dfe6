use reqwest::{Client, Response, StatusCode, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::download::PdfDownloadStage;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected reply shape: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    // Wire names belong to the upstream domain service.
    correo: &'a str,
    contrasena: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    token: String,
}

/// Thin client for the gateway.
///
/// Response stages are opt-in: a client that never registers the PDF stage
/// sees every response byte-for-byte, including binary ones.
pub struct GatewayClient {
    http: Client,
    base_url: String,
    bearer: Option<String>,
    pdf_stage: Option<PdfDownloadStage>,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: None,
            pdf_stage: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Register the PDF download stage for every response of this client.
    pub fn with_pdf_stage(mut self, stage: PdfDownloadStage) -> Self {
        self.pdf_stage = Some(stage);
        self
    }

    /// Log in and keep the returned token as the bearer for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), SdkError> {
        let response = self
            .http
            .post(format!("{}/api/v1/auth/login", self.base_url))
            .json(&LoginRequest {
                correo: email,
                contrasena: password,
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SdkError::Status { status, body: text });
        }

        let reply: LoginReply = serde_json::from_str(&text)?;
        self.bearer = Some(reply.token);
        Ok(())
    }

    pub async fn get(&self, path: &str) -> Result<Response, SdkError> {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().await?;

        Ok(match &self.pdf_stage {
            Some(stage) => stage.apply(response).await,
            None => response,
        })
    }
}
