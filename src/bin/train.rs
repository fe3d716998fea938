//! Fraud Detection Model Training Entry Point
//!
//! Loads the transaction dataset, preprocesses and balances it, fits the
//! boosted-tree classifier, evaluates it on the held-out split, and writes
//! the model artifact the serving process loads.

use anyhow::Result;
use kenam::config::AppConfig;
use kenam::dataset::Dataset;
use kenam::models::Trainer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    match config.logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    info!("Starting fraud detection model training");

    let dataset = Dataset::from_csv_path(&config.training.data_path)?;
    let trainer = Trainer::new(config.training.clone());
    let outcome = trainer.run(dataset)?;

    outcome.model.save(&config.model.path)?;

    info!(
        accuracy = format!("{:.4}", outcome.report.accuracy),
        model = %config.model.path,
        "Training complete"
    );

    Ok(())
}
