//! Persisted model artifact: load, save, and single-record inference.

use anyhow::{anyhow, Context, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a single inference call.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    /// Binary verdict: 0 = legitimate, 1 = fraudulent.
    pub label: u8,
    /// Class-1 probability reported by the boosted ensemble.
    pub probability: f64,
}

/// A trained boosted-tree model, immutable for the life of the process.
pub struct FraudModel {
    gbdt: GBDT,
}

impl FraudModel {
    /// Wrap a freshly trained ensemble.
    pub fn from_gbdt(gbdt: GBDT) -> Self {
        Self { gbdt }
    }

    /// Load a persisted model from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Model path is not valid UTF-8: {}", path.display()))?;

        let gbdt = GBDT::load_model(path_str)
            .map_err(|e| anyhow!("Failed to load model from {}: {}", path.display(), e))?;

        info!(path = %path.display(), "Model artifact loaded");
        Ok(Self { gbdt })
    }

    /// Load the model if the artifact exists, warning instead of failing.
    ///
    /// The server starts without a model and reports it via `/health`;
    /// prediction requests then get an explicit error instead of a crash.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                path = %path.display(),
                "Model file not found, run kenam-train first. Serving without a model."
            );
            return None;
        }

        match Self::load(path) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!(error = %e, "Failed to load model artifact. Serving without a model.");
                None
            }
        }
    }

    /// Persist the model, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create model directory {}", dir.display()))?;
            }
        }

        let path_str = path
            .to_str()
            .with_context(|| format!("Model path is not valid UTF-8: {}", path.display()))?;

        self.gbdt
            .save_model(path_str)
            .map_err(|e| anyhow!("Failed to save model to {}: {}", path.display(), e))?;

        info!(path = %path.display(), "Model artifact saved");
        Ok(())
    }

    /// Run inference on a coerced feature vector in trained column order.
    pub fn predict(&self, features: &[f32]) -> Prediction {
        let batch: DataVec = vec![Data::new_test_data(features.to_vec(), None)];
        let predictions = self.gbdt.predict(&batch);

        // Log-likelihood loss yields the positive-class probability.
        let probability = predictions.first().copied().unwrap_or(0.5) as f64;
        Prediction {
            label: u8::from(probability >= 0.5),
            probability,
        }
    }
}
