//! Commute HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use application::{CommuteBatchService, CommutePort, HealthService, SpreadsheetPort};
use infrastructure::{
    AppConfig, BaiduCommuteAdapter, ExcelSpreadsheetAdapter, LogFormat, config::LEGACY_KEYS_VAR,
    init_tracing,
};
use presentation_http::{
    ProgressBroadcaster, ShutdownTrigger, routes, run_with_deadline, shutdown_signal,
    spawn_file_cleanup_task, state::AppState,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so the log format can be honoured
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = AppConfig::default();
            config.apply_legacy_keys(std::env::var(LEGACY_KEYS_VAR).ok().as_deref());
            (config, Some(e))
        },
    };

    init_tracing(
        "commute_server=debug,presentation_http=debug,tower_http=debug",
        LogFormat::from_setting(&config.server.log_format),
    )?;

    info!("🚌 Commute server v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = %config.server.port,
        keys = config.baidu.api_keys.len(),
        daily_cap = config.baidu.daily_cap,
        upload_dir = %config.storage.upload_dir.display(),
        "Configuration loaded"
    );

    // Initialize adapters
    let commute: Arc<dyn CommutePort> =
        Arc::new(BaiduCommuteAdapter::new(&config.baidu.to_baidu_config())?);
    let spreadsheets: Arc<dyn SpreadsheetPort> =
        Arc::new(ExcelSpreadsheetAdapter::from_config(&config.storage)?);

    // Initialize services
    let batch_service = Arc::new(CommuteBatchService::new(
        Arc::clone(&commute),
        spreadsheets,
    ));
    let health_service = Arc::new(HealthService::new(commute));

    let cleanup_handle = spawn_file_cleanup_task(
        Arc::clone(&batch_service),
        config.storage.max_file_age(),
        config.storage.sweep_interval(),
    );

    let config = Arc::new(config);
    let state = AppState {
        batch_service,
        health_service,
        progress: ProgressBroadcaster::new(),
        config: Arc::clone(&config),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    // First added = outermost
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer),
    );

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);
    info!("📊 Health: http://{}/health", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    let (trigger, shutdown_started) = ShutdownTrigger::new();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        trigger.fire();
    });

    let outcome =
        run_with_deadline(server.into_future(), shutdown_started, shutdown_timeout).await?;

    cleanup_handle.abort();
    info!(?outcome, "👋 Server shutdown complete");

    Ok(())
}
