//! PDF download stage.
//!
//! Observes a response *after* the network call: when the content type is
//! `application/pdf`, the body is siphoned into a local file save and the
//! caller receives a stand-in with the original status and headers but an
//! empty body. Callers that only look at status/headers keep working
//! unmodified.
//!
//! Failure to save degrades to no interception: the original response
//! (rebuilt from the buffered bytes) is returned and a warning is logged.
//! The network call itself is never aborted by this stage.

use std::path::{Path, PathBuf};

use reqwest::{
    Response, StatusCode,
    header::{self, HeaderMap},
};

const DEFAULT_FILENAME: &str = "document.pdf";

pub struct PdfDownloadStage {
    save_dir: PathBuf,
}

impl PdfDownloadStage {
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    /// Process one response. Non-PDF responses pass through untouched.
    pub async fn apply(&self, response: Response) -> Response {
        let is_pdf = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/pdf"));

        if !is_pdf {
            return response;
        }

        let status = response.status();
        let headers = response.headers().clone();

        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "pdf stage could not buffer response body");
                return rebuild(status, headers, Vec::new());
            }
        };

        let target = self.save_dir.join(&filename);
        match save(&self.save_dir, &target, &bytes).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), "saved pdf");
                rebuild(status, headers, Vec::new())
            }
            Err(err) => {
                tracing::warn!(error = %err, "pdf save failed; passing response through");
                rebuild(status, headers, bytes.to_vec())
            }
        }
    }
}

async fn save(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(target, bytes).await
}

/// Stand-in with the caller-visible parts preserved. Only the body changes.
fn rebuild(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Response {
    let mut stand_in = http::Response::new(body);
    *stand_in.status_mut() = status;
    *stand_in.headers_mut() = headers;
    Response::from(stand_in)
}

/// Extract the filename hint from a `Content-Disposition` value.
/// Quotes are optional; anything after a `;` or closing quote is dropped.
/// The name is reduced to its final path component so a hostile header
/// cannot steer the save location.
fn filename_from_disposition(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let idx = lower.find("filename=")?;
    let rest = value[idx + "filename=".len()..].trim_start();

    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or(""),
        None => rest.split(';').next().unwrap_or(""),
    };

    let name = name
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .to_string();

    if name.is_empty() { None } else { Some(name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_response(disposition: Option<&str>, body: &[u8]) -> Response {
        let mut builder = http::Response::builder()
            .status(200)
            .header("content-type", "application/pdf");
        if let Some(d) = disposition {
            builder = builder.header("content-disposition", d);
        }
        Response::from(builder.body(body.to_vec()).unwrap())
    }

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gateway-sdk-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn parses_disposition_variants() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="x.pdf""#),
            Some("x.pdf".to_string())
        );
        assert_eq!(
            filename_from_disposition("inline; filename=settlement.pdf"),
            Some("settlement.pdf".to_string())
        );
        assert_eq!(
            filename_from_disposition("inline; filename=a.pdf; size=3"),
            Some("a.pdf".to_string())
        );
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn filename_is_reduced_to_its_basename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="../../evil.pdf""#),
            Some("evil.pdf".to_string())
        );
    }

    #[tokio::test]
    async fn saves_pdf_and_strips_body() {
        let dir = temp_dir("save");
        let stage = PdfDownloadStage::new(&dir);

        let response = pdf_response(Some(r#"attachment; filename="x.pdf""#), b"%PDF-1.4 test");
        let out = stage.apply(response).await;

        assert_eq!(out.status(), StatusCode::OK);
        assert_eq!(
            out.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        assert!(out.bytes().await.unwrap().is_empty());

        let saved = tokio::fs::read(dir.join("x.pdf")).await.unwrap();
        assert_eq!(saved, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn malformed_disposition_falls_back_to_default_name() {
        let dir = temp_dir("fallback");
        let stage = PdfDownloadStage::new(&dir);

        let response = pdf_response(Some("attachment"), b"%PDF-1.4 fallback");
        let out = stage.apply(response).await;

        assert_eq!(out.status(), StatusCode::OK);
        let saved = tokio::fs::read(dir.join(DEFAULT_FILENAME)).await.unwrap();
        assert_eq!(saved, b"%PDF-1.4 fallback");
    }

    #[tokio::test]
    async fn non_pdf_passes_through_untouched() {
        let dir = temp_dir("passthrough");
        let stage = PdfDownloadStage::new(&dir);

        let response = Response::from(
            http::Response::builder()
                .status(404)
                .header("content-type", "application/json")
                .body(br#"{"error":"not found"}"#.to_vec())
                .unwrap(),
        );
        let out = stage.apply(response).await;

        assert_eq!(out.status(), StatusCode::NOT_FOUND);
        assert_eq!(out.bytes().await.unwrap().as_ref(), br#"{"error":"not found"}"#);
    }
}
