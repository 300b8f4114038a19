use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use showroom_core::media::MediaStore;
use showroom_db::DbPool;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showroom_api::config::ServerConfig;
use showroom_api::router::build_app_router;
use showroom_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        media_url_prefix = %config.media_url_prefix,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded server configuration",
    );

    let pool = prepare_database().await;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media: MediaStore::new(&config.upload_dir),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Showroom API listening");

    serve(listener, app, Duration::from_secs(config.shutdown_timeout_secs)).await;
    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showroom_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn prepare_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = showroom_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    showroom_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    showroom_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready (pool created, migrations applied)");
    pool
}

/// Serve until a termination signal, then give in-flight requests
/// `drain_timeout` to finish before returning anyway.
async fn serve(listener: TcpListener, app: Router, drain_timeout: Duration) {
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    let drain_deadline = async move {
        match signalled_rx.await {
            Ok(()) => tokio::time::sleep(drain_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = &mut server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = drain_timeout.as_secs(),
                "Drain timeout elapsed, dropping in-flight requests",
            );
        }
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down, draining in-flight requests");
}
