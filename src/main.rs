//! Fraud Detection Service - Serving Entry Point
//!
//! Loads the persisted model artifact and serves predictions over HTTP.

use anyhow::Result;
use kenam::config::AppConfig;
use kenam::metrics::MetricsReporter;
use kenam::models::FraudModel;
use kenam::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging.level, &config.logging.format);

    info!("Starting Kenam fraud detection service");

    let model = FraudModel::load_optional(&config.model.path);
    let state = AppState::new(model);

    // Periodic metrics summary in the logs
    let metrics = state.metrics.clone();
    let interval_secs = config.server.metrics_interval_secs;
    tokio::spawn(async move {
        MetricsReporter::new(metrics, interval_secs).start().await;
    });

    server::run(&config, state).await
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match format {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
