pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod validation;

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::{
    catalog::SubjectCatalog,
    config::Config,
    db::open_store,
    errors::AppError,
    middleware::{cors_layer, panic_response},
    state::AppState,
};

/// The full application router: review routes plus the tracing, CORS and
/// panic-isolation layers.
pub fn build_app(state: AppState, allowed_origins: Option<&[String]>) -> Router {
    http::create_http_routes(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting {} server with {:?} backend",
        config.variant,
        config.backend
    );

    let store = open_store(&config).await.map_err(|e| {
        tracing::error!("Error opening store: {}", e);
        AppError::from_store("Failed to open store", config.variant.noun(), e)
    })?;

    let catalog = match &config.catalog_path {
        Some(path) => SubjectCatalog::load(path).await?,
        None => SubjectCatalog::builtin(config.variant),
    };

    let state = AppState {
        store: store.clone(),
        variant: config.variant,
        catalog: Arc::new(catalog),
    };
    let app = build_app(state, config.allowed_origins.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind {}: {}", addr, e);
        AppError::InternalError
    })?;

    let prefix = config.variant.route_prefix();
    tracing::info!("{} server running on port {}", config.variant.noun(), config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);
    tracing::info!("API endpoints:");
    tracing::info!("  POST {prefix}");
    tracing::info!("  GET {prefix}");
    tracing::info!("  GET {prefix}/{{subject_id}}");
    tracing::info!("  PUT {prefix}/{{id}}");
    tracing::info!("  DELETE {prefix}/{{id}}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await;

    tracing::info!("Shutting down {} server", config.variant);
    store.close().await;

    served.map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                tracing::warn!("Could not register signal handlers, falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
