#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use showroom_api::auth::token::{self, EditorRole, TokenConfig};
use showroom_api::config::ServerConfig;
use showroom_api::router::build_app_router;
use showroom_api::state::AppState;
use showroom_core::media::MediaStore;

/// Smallest byte sequence recognised as a PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

const BOUNDARY: &str = "showroom-test-boundary";

/// Router plus the temporary upload root it serves from.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    pub token: String,
    pub config: ServerConfig,
}

impl TestApp {
    /// Absolute path of a stored relative media path.
    pub fn media_file(&self, relative: &str) -> PathBuf {
        self.upload_dir.path().join(relative)
    }

    /// A valid token for a read-only role.
    pub fn viewer_token(&self) -> String {
        token::mint(2, EditorRole::Viewer, &self.config.tokens).expect("mint token")
    }

    /// Number of files stored for a collection.
    pub fn stored_count(&self, collection: &str) -> usize {
        std::fs::read_dir(self.upload_dir.path().join(collection))
            .map(|d| d.count())
            .unwrap_or(0)
    }
}

/// Build a test `ServerConfig` with safe defaults rooted at `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        media_url_prefix: "/uploads".to_string(),
        max_upload_bytes: 5 * 1024 * 1024,
        tokens: TokenConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            ttl_mins: 15,
            leeway_secs: 0,
        },
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over a fresh temporary upload directory.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("create upload dir");
    let config = test_config(upload_dir.path());
    let token = token::mint(1, EditorRole::Admin, &config.tokens).expect("mint token");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media: MediaStore::new(upload_dir.path()),
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
        token,
        config,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.png\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a multipart request, authenticated unless `authed` is false.
pub async fn multipart(
    app: &TestApp,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    authed: bool,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if authed {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", app.token));
    }
    let request = builder.body(Body::from(multipart_body(parts))).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Detached deletions run on background tasks; poll until `path` is gone.
pub async fn wait_until_removed(path: &Path) {
    for _ in 0..100 {
        if !path.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} was not removed", path.display());
}
