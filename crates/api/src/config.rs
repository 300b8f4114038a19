use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::token::TokenConfig;

/// Default maximum request body size for multipart uploads (25 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development against the admin UI dev server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Root directory for uploaded media.
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under.
    pub media_url_prefix: String,
    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
    pub tokens: TokenConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `4000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `UPLOAD_DIR`            | `uploads`               |
    /// | `MEDIA_URL_PREFIX`      | `/uploads`              |
    /// | `MAX_UPLOAD_BYTES`      | `26214400`              |
    ///
    /// Token settings are read by [`TokenConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 4000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            upload_dir: env_or("UPLOAD_DIR", PathBuf::from("uploads")),
            media_url_prefix: normalize_prefix(&env_or(
                "MEDIA_URL_PREFIX",
                "/uploads".to_string(),
            )),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            tokens: TokenConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, or return `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value {raw:?}: {e}")),
        Err(_) => default,
    }
}

/// Ensure a single leading slash and no trailing slash (`uploads/` -> `/uploads`).
///
/// Panics on an empty prefix: the media route cannot be mounted at `/`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    assert!(!trimmed.is_empty(), "MEDIA_URL_PREFIX must not be empty or '/'");
    format!("/{trimmed}")
}
