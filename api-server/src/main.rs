//! Studata API Server binary
//!
//! Startup order: logging, configuration, explanation service (load or
//! train the pipeline), then the listener. Any failure before the listener
//! binds aborts the process.

use anyhow::Context;
use studata_api::{create_router, AppState, Config};
use studata_core::ExplanationService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studata_api=debug,studata_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Studata API starting ({})...", config.environment);
    tracing::info!(
        "Dataset: {}, pipeline: {}",
        config.data_path.display(),
        config.model_path.display()
    );

    // Build the explanation service off the async runtime (may train)
    let service_config = config.service_config();
    let service = tokio::task::spawn_blocking(move || ExplanationService::init(&service_config))
        .await
        .context("service initialization task failed")?
        .context("failed to initialize explanation service")?;

    let addr = config.bind_addr();
    let state = AppState::new(service, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
