//! The binary entry point for the application.

use std::sync::Arc;
use std::time::Duration;

use app_core::config::Config;
use app_core::identity::{IdentityVerifier, JwtIdentityVerifier, VerifierConfig};
use app_core::middleware::request_response_logger;
use app_core::storage::StorageService;
use app_core::storage::local::LocalStorageService;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{Json, Router, middleware, routing};
use sea_orm::{ConnectOptions, Database};
use tokio::signal;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_BODY_LIMIT: usize = 8 * 1024 * 1024;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .init();

    if let Err(err) = run().await {
        panic!("❌ Application failed to start: {err}");
    }
}

/// Initializes all dependencies and starts the web server.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // The .watch() method enables automatic reloading when the config file changes.
    let config = Arc::new(
        Config::builder("config/config.yaml")
            .watch_interval(Duration::from_secs(5))
            .watch()
            .build()?,
    );

    // Initialize the SeaORM database connection pool.
    let mut db_opt = ConnectOptions::new(config.get::<String>("database.url")?);
    db_opt
        .min_connections(config.get("database.min_connections")?)
        .max_connections(config.get("database.max_connections")?)
        .connect_timeout(Duration::from_secs(config.get("database.connect_timeout_secs")?))
        .acquire_timeout(Duration::from_secs(config.get("database.acquire_timeout_secs")?))
        .idle_timeout(Duration::from_secs(config.get("database.idle_timeout_secs")?))
        .max_lifetime(Duration::from_secs(config.get("database.max_lifetime_secs")?))
        .sqlx_logging(config.get("database.sqlx_logging")?)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db_pool = Arc::new(Database::connect(db_opt).await?);

    if config.get_or("database.auto_migrate", false) {
        social::ensure_schema(db_pool.as_ref()).await?;
    }

    // Instantiate the identity verifier for tokens issued by the external provider.
    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwtIdentityVerifier::new(VerifierConfig {
        algorithm: config.get_or("auth.algorithm", "HS256".to_string()),
        secret: config.get("auth.secret").ok(),
        public_key_pem: config.get("auth.public_key_pem").ok(),
        issuer: config.get("auth.issuer")?,
        audience: config.get("auth.audience")?,
        leeway_secs: config.get_or("auth.leeway_secs", 60),
    })?);

    // Initialize the storage service.
    let base_path: String = config.get("storage.local.base_path")?;
    let base_url: String = config.get("storage.local.base_url")?;
    let local_storage = LocalStorageService::new(base_path, base_url.clone());
    let photos_dir = local_storage.base_path().to_path_buf();
    let storage_service: Arc<dyn StorageService> = Arc::new(local_storage);

    // Initialize social module
    let social_state = social::new(social::Dependency {
        db: db_pool.clone(),
        config: config.clone(),
        storage: storage_service,
    });

    // Create the Router and Middlewares
    let timeout_secs = Duration::from_secs(config.get::<u64>("server.timeout_secs")?);
    let body_limit = config.get_or("server.body_limit_bytes", DEFAULT_BODY_LIMIT);

    let mut app = Router::new()
        .merge(social::create_router(social_state, verifier))
        .route(
            "/",
            routing::get(|| async { Json(serde_json::json!({"message": "Hello from Social API"})) }),
        );

    // Stored photo references are "{base_url}/{key}"; serve them when the base is a local path.
    let mount_path = base_url.trim_end_matches('/');
    if mount_path.starts_with('/') && mount_path.len() > 1 {
        app = app.nest_service(mount_path, ServeDir::new(photos_dir));
    } else {
        tracing::warn!("storage.local.base_url {} is not a local path, photos are not served", base_url);
    }

    let app = app
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"kind": "not_found", "message": "Endpoint not found"})),
            )
        })
        .method_not_allowed_fallback(|| async {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(serde_json::json!({"kind": "bad_request", "message": "Method not allowed"})),
            )
        })
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_response_logger))
                .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout_secs))
                .layer(DefaultBodyLimit::max(body_limit)),
        );

    let server_address = config.get::<String>("server.address")?;
    let listener = tokio::net::TcpListener::bind(&server_address).await?;

    tracing::info!("🚀 listening on {}", listener.local_addr()?);

    let (shutdown_tx, _) = broadcast::channel(1);
    spawn_shutdown_listener(shutdown_tx.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_tx.subscribe().recv().await.ok();
            tracing::info!("🛑 Server is shutting down gracefully...");
        })
        .await?;

    match Arc::try_unwrap(db_pool) {
        Ok(db) => db.close().await?,
        Err(_) => tracing::warn!("Database pool still shared at shutdown, leaving it to drop"),
    }

    Ok(())
}

/// Spawns a background task to listen for system shutdown signals.
fn spawn_shutdown_listener(shutdown_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(err) = signal::ctrl_c().await {
                tracing::error!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                },
                Err(err) => {
                    tracing::error!("Failed to install SIGTERM handler: {}", err);
                    std::future::pending::<()>().await;
                },
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("🔻 Received SIGINT (Ctrl+C)")},
            _ = terminate => { tracing::info!("🔻 Received SIGTERM")},
        }

        if shutdown_tx.send(()).is_err() {
            tracing::error!("Failed to send shutdown signal");
        }
    });
}
