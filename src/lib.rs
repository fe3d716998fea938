//! Kenam Fraud Detection Service Library
//!
//! Trains a gradient-boosted classifier on tabular transaction data and
//! serves its binary fraud verdicts over HTTP.

pub mod config;
pub mod dataset;
pub mod features;
pub mod metrics;
pub mod models;
pub mod preprocess;
pub mod sampling;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use dataset::Dataset;
pub use features::FeatureSchema;
pub use models::{FraudModel, Trainer};
pub use types::{PredictResponse, Verdict};
