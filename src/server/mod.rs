//! HTTP serving layer: shared state, routing, and startup.

pub mod handlers;

use crate::config::AppConfig;
use crate::features::FeatureSchema;
use crate::metrics::ServiceMetrics;
use crate::models::FraudModel;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// State shared by every request handler. The model is read-only after
/// startup, so plain `Arc` sharing is all the coordination needed.
#[derive(Clone)]
pub struct AppState {
    pub model: Option<Arc<FraudModel>>,
    pub schema: Arc<FeatureSchema>,
    pub metrics: Arc<ServiceMetrics>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(model: Option<FraudModel>) -> Self {
        Self {
            model: model.map(Arc::new),
            schema: Arc::new(FeatureSchema::new()),
            metrics: Arc::new(ServiceMetrics::new()),
            started_at: Utc::now(),
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/predict/form", post(handlers::predict_form))
        .route("/predict/upload", post(handlers::predict_upload))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: &AppConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Prediction API listening");

    axum::serve(listener, router(state))
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
