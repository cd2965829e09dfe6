//! Shared utilities for integration tests: mock upstream / mock storage
//! servers on ephemeral ports, plus a gateway spawner wired to them.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::json;
use url::Url;

use referee_gateway::app;
use referee_gateway::config::{AppEnv, Config};
use referee_gateway::services::storage::StorageConfig;
use referee_gateway::services::upstream::UpstreamConfig;

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< >>\n%%EOF\n";

pub struct MockServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A bearer token that decodes (base64url JSON payload) but carries no
/// real signature — the gateway propagates it without verifying.
pub fn unsigned_token(sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}"}}"#));
    format!("{header}.{payload}.unsigned")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn count_hits(State(hits): State<Arc<AtomicUsize>>, req: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

/// Mock of the upstream domain service.
pub async fn spawn_upstream() -> MockServer {
    let hits = Arc::new(AtomicUsize::new(0));

    async fn login(Json(body): Json<serde_json::Value>) -> impl IntoResponse {
        if body.get("correo").is_some() {
            (StatusCode::OK, Json(json!({"token": "mock-token"}))).into_response()
        } else {
            (StatusCode::BAD_REQUEST, Json(json!({"error": "bad credentials"}))).into_response()
        }
    }

    async fn profile() -> impl IntoResponse {
        (StatusCode::FORBIDDEN, Json(json!({"error": "forbidden"})))
    }

    async fn update_profile(mut multipart: Multipart) -> impl IntoResponse {
        let mut url_foto = None;
        let mut quitar_foto = None;
        let mut fechas = Vec::new();
        let mut saw_file = false;

        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "urlFoto" => url_foto = Some(field.text().await.unwrap()),
                "quitarFoto" => quitar_foto = Some(field.text().await.unwrap()),
                "fechasDisponibles" => fechas.push(field.text().await.unwrap()),
                _ => {
                    let _ = field.bytes().await.unwrap();
                    saw_file = saw_file || name == "foto";
                }
            }
        }

        Json(json!({
            "urlFoto": url_foto,
            "quitarFoto": quitar_foto,
            "fechasDisponibles": fechas,
            "sawFile": saw_file,
        }))
    }

    async fn assignments(headers: HeaderMap) -> impl IntoResponse {
        let echo = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "authorization": echo("authorization"),
            "xApiKey": echo("x-api-key"),
            "asignaciones": [{"id": 1, "torneo": "Nacional"}],
        }))
    }

    async fn settlements() -> impl IntoResponse {
        Json(json!([{"id": 7, "torneo": "Nacional", "monto": 450000}]))
    }

    async fn settlement_pdf(Path(id): Path<String>) -> Response {
        if id == "7" {
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/pdf")],
                PDF_BYTES,
            )
                .into_response()
        } else {
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                "not found",
            )
                .into_response()
        }
    }

    async fn news(Query(params): Query<Vec<(String, String)>>, headers: HeaderMap) -> impl IntoResponse {
        let key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({"query": params, "xApiKey": key}))
    }

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/arbitro/perfil", get(profile).put(update_profile))
        .route("/api/arbitro/asignaciones", get(assignments))
        .route("/api/arbitro/liquidaciones", get(settlements))
        .route("/api/arbitro/liquidaciones/{id}/pdf", get(settlement_pdf))
        .route("/api/news/nba-api", get(news))
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let addr = serve(app).await;
    MockServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Mock of the object-storage provider: one multipart upload endpoint
/// answering with a durable URL.
pub async fn spawn_storage() -> MockServer {
    let hits = Arc::new(AtomicUsize::new(0));

    async fn upload(mut multipart: Multipart) -> Response {
        let mut public_id = None;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "public_id" => public_id = Some(field.text().await.unwrap()),
                _ => {
                    let _ = field.bytes().await.unwrap();
                }
            }
        }

        match public_id {
            Some(id) => Json(json!({
                "secure_url": format!("https://cdn.test/arbitros/{id}")
            }))
            .into_response(),
            None => (StatusCode::BAD_REQUEST, "missing public_id").into_response(),
        }
    }

    let app = Router::new()
        .route("/upload", post(upload))
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let addr = serve(app).await;
    MockServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Storage provider that rejects every upload.
pub async fn spawn_broken_storage() -> MockServer {
    let hits = Arc::new(AtomicUsize::new(0));

    async fn upload(mut multipart: Multipart) -> Response {
        while let Some(field) = multipart.next_field().await.unwrap() {
            let _ = field.bytes().await.unwrap();
        }
        (StatusCode::INTERNAL_SERVER_ERROR, "disk on fire").into_response()
    }

    let app = Router::new()
        .route("/upload", post(upload))
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let addr = serve(app).await;
    MockServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

pub fn test_config(
    upstream_base: &str,
    storage_base: Option<&str>,
    upstream_api_key: Option<&str>,
) -> Config {
    // Port 9 (discard) stands in when a test never touches storage.
    let storage_upload_url = match storage_base {
        Some(base) => format!("{base}/upload"),
        None => "http://127.0.0.1:9/upload".to_string(),
    };

    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        upstream: UpstreamConfig {
            base_url: Url::parse(upstream_base).unwrap(),
            api_key: upstream_api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
        },
        news_path: "/api/news/nba-api".to_string(),
        max_upload_bytes: 5 * 1024 * 1024,
        storage: StorageConfig {
            upload_url: Url::parse(&storage_upload_url).unwrap(),
            api_key: "test-key".to_string(),
            folder: "arbitros".to_string(),
        },
        verification: None,
    }
}

/// Boot the gateway against the given mocks; returns its base URL.
pub async fn spawn_gateway(
    upstream_base: &str,
    storage_base: Option<&str>,
    upstream_api_key: Option<&str>,
) -> String {
    let config = test_config(upstream_base, storage_base, upstream_api_key);
    let state = app::build_state(&config).unwrap();
    let router = app::build_router(state, &config);
    let addr = serve(router).await;
    format!("http://{addr}")
}
