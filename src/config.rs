/*
 * Responsibility
 * - 環境変数や設定の読み込み (upstream / storage / auth / CORS 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - provider の資格情報は Config 経由で明示的に注入する (暗黙のグローバル初期化はしない)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::storage::StorageConfig;
use crate::services::upstream::UpstreamConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Token verification settings. Only present when a public key is
/// configured; without it the gateway propagates bearer tokens without
/// checking signatures (and says so at startup).
#[derive(Clone, Debug)]
pub struct VerificationConfig {
    pub public_key_pem: String,
    pub issuer: String,
    pub audience: String,
    pub leeway_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub upstream: UpstreamConfig,
    pub news_path: String,
    pub max_upload_bytes: usize,

    pub storage: StorageConfig,

    pub verification: Option<VerificationConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let upstream_base_url = std::env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let upstream_base_url =
            Url::parse(&upstream_base_url).map_err(|_| ConfigError::Invalid("UPSTREAM_BASE_URL"))?;

        let upstream_api_key = std::env::var("UPSTREAM_API_KEY").ok().filter(|s| !s.is_empty());

        let upstream_timeout_seconds = std::env::var("UPSTREAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let upstream = UpstreamConfig {
            base_url: upstream_base_url,
            api_key: upstream_api_key,
            timeout: Duration::from_secs(upstream_timeout_seconds),
        };

        let news_path =
            std::env::var("NEWS_PATH").unwrap_or_else(|_| "/api/news/nba-api".to_string());

        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(5);
        let max_upload_bytes = max_upload_mb * 1024 * 1024;

        let storage_upload_url = std::env::var("STORAGE_UPLOAD_URL")
            .map_err(|_| ConfigError::Missing("STORAGE_UPLOAD_URL"))?;
        let storage_upload_url =
            Url::parse(&storage_upload_url).map_err(|_| ConfigError::Invalid("STORAGE_UPLOAD_URL"))?;

        let storage_api_key =
            std::env::var("STORAGE_API_KEY").map_err(|_| ConfigError::Missing("STORAGE_API_KEY"))?;

        let storage_folder =
            std::env::var("STORAGE_FOLDER").unwrap_or_else(|_| "arbitros".to_string());

        let storage = StorageConfig {
            upload_url: storage_upload_url,
            api_key: storage_api_key,
            folder: storage_folder,
        };

        // Verification is opt-in: configure a public key to turn it on.
        let verification = match std::env::var("ACCESS_JWT_PUBLIC_KEY_PEM") {
            Ok(pem) if !pem.is_empty() => {
                let issuer = std::env::var("AUTH_ISSUER")
                    .map_err(|_| ConfigError::Missing("AUTH_ISSUER"))?;
                let audience = std::env::var("AUTH_AUDIENCE")
                    .map_err(|_| ConfigError::Missing("AUTH_AUDIENCE"))?;
                let leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);

                Some(VerificationConfig {
                    public_key_pem: pem.replace("\\n", "\n"),
                    issuer,
                    audience,
                    leeway_seconds,
                })
            }
            _ => None,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            upstream,
            news_path,
            max_upload_bytes,
            storage,
            verification,
        })
    }
}
