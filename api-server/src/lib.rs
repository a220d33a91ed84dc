//! Studata API Server
//!
//! HTTP surface over the student outcome model and its explanations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       STUDATA API                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌──────────────────────────────────────┐  │
//! │  │  Router   │───▶│  ExplanationService (Arc, read-only) │  │
//! │  │  (Axum)   │    │  pipeline · mapping · tree SHAP      │  │
//! │  └───────────┘    └──────────────────┬───────────────────┘  │
//! │                                      ▼                      │
//! │                   ┌────────────────────────────────┐        │
//! │                   │  data.csv · model_pipeline.json│        │
//! │                   └────────────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use studata_core::ExplanationService;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExplanationService>,
    pub config: Config,
}

impl AppState {
    pub fn new(service: ExplanationService, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::check))
        .route("/model", get(handlers::model::info))
        // Prediction
        .route("/predict", post(handlers::predict::predict))
        // Explanations
        .route("/explain/global", get(handlers::explain::global))
        .route("/explain/local/:id", get(handlers::explain::local))
        // Students
        .route("/students", get(handlers::students::list))
        .route("/students/:id", get(handlers::students::get))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
