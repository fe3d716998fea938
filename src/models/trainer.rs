//! Boosted-tree training pipeline.
//!
//! Runs the full pass from raw dataset to persisted-ready model: preprocess,
//! stratified split, minority oversampling, fit, and held-out evaluation.

use crate::config::TrainingConfig;
use crate::dataset::Dataset;
use crate::models::artifact::FraudModel;
use crate::models::evaluation::EvaluationReport;
use crate::preprocess;
use crate::sampling::Smote;
use anyhow::{bail, Result};
use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use tracing::info;

/// Everything a training run produces.
pub struct TrainingOutcome {
    pub model: FraudModel,
    pub report: EvaluationReport,
    pub feature_names: Vec<String>,
}

/// Orchestrates one training run from a loaded dataset.
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Train, evaluate, and return the fitted model.
    pub fn run(&self, dataset: Dataset) -> Result<TrainingOutcome> {
        let prepared = preprocess::prepare(dataset)?;
        let mut split =
            preprocess::stratified_split(&prepared, self.config.test_size, self.config.seed)?;

        let smote = Smote::new(self.config.smote_neighbors, self.config.seed);
        smote.balance(&mut split.train_features, &mut split.train_labels);

        info!(
            rows = split.train_features.len(),
            features = prepared.feature_names.len(),
            iterations = self.config.iterations,
            max_depth = self.config.max_depth,
            "Fitting boosted-tree classifier"
        );

        let gbdt = self.fit(
            &split.train_features,
            &split.train_labels,
            prepared.feature_names.len(),
        )?;
        let model = FraudModel::from_gbdt(gbdt);

        let predicted: Vec<u8> = split
            .test_features
            .iter()
            .map(|features| model.predict(features).label)
            .collect();
        let report = EvaluationReport::from_predictions(&split.test_labels, &predicted);
        report.log();

        Ok(TrainingOutcome {
            model,
            report,
            feature_names: prepared.feature_names,
        })
    }

    fn fit(&self, features: &[Vec<f32>], labels: &[u8], feature_size: usize) -> Result<GBDT> {
        if features.is_empty() {
            bail!("No training rows after preprocessing");
        }

        let mut cfg = GbdtConfig::new();
        cfg.set_feature_size(feature_size);
        cfg.set_max_depth(self.config.max_depth);
        cfg.set_iterations(self.config.iterations);
        cfg.set_shrinkage(self.config.learning_rate);
        cfg.set_loss("LogLikelyhood");
        // Subsampling in the boosting library is not seedable; full sampling
        // keeps a fixed dataset + seed reproducible run to run.
        cfg.set_data_sample_ratio(1.0);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_training_optimization_level(2);

        // Log-likelihood loss trains on +1/-1 labels.
        let mut training: DataVec = features
            .iter()
            .zip(labels)
            .map(|(f, &label)| {
                let target = if label == 1 { 1.0 } else { -1.0 };
                Data::new_training_data(f.clone(), 1.0, target, None)
            })
            .collect();

        let mut gbdt = GBDT::new(&cfg);
        gbdt.fit(&mut training);
        Ok(gbdt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Dataset};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn test_config() -> TrainingConfig {
        TrainingConfig {
            iterations: 30,
            max_depth: 4,
            ..TrainingConfig::default()
        }
    }

    /// Separable synthetic transactions: fraud rows have large amounts on
    /// young accounts.
    fn synthetic_dataset(rows: usize) -> Dataset {
        let mut rng = StdRng::seed_from_u64(1234);
        let columns = vec![
            "account_id".to_string(),
            "transaction_amount".to_string(),
            "account_age_days".to_string(),
            "account_type_personal".to_string(),
            "is_fraud".to_string(),
        ];

        let mut data_rows = Vec::with_capacity(rows);
        for i in 0..rows {
            let fraud = i % 5 == 0;
            let (amount, age, personal) = if fraud {
                (
                    rng.gen_range(3000.0..9000.0),
                    rng.gen_range(1.0..90.0),
                    "False",
                )
            } else {
                (
                    rng.gen_range(20.0..1000.0),
                    rng.gen_range(200.0..3000.0),
                    "True",
                )
            };
            data_rows.push(vec![
                Cell::Number(i as f64),
                Cell::Number(amount),
                Cell::Number(age),
                Cell::Text(personal.to_string()),
                Cell::Number(f64::from(u8::from(fraud))),
            ]);
        }

        Dataset {
            columns,
            rows: data_rows,
        }
    }

    #[test]
    fn test_training_learns_separable_data() {
        let trainer = Trainer::new(test_config());
        let outcome = trainer.run(synthetic_dataset(150)).unwrap();

        assert_eq!(
            outcome.feature_names,
            vec!["transaction_amount", "account_age_days", "account_type_personal"]
        );
        assert!(
            outcome.report.accuracy >= 0.7,
            "accuracy too low: {}",
            outcome.report.accuracy
        );
    }

    #[test]
    fn test_training_is_reproducible() {
        let trainer = Trainer::new(test_config());
        let first = trainer.run(synthetic_dataset(150)).unwrap();
        let second = trainer.run(synthetic_dataset(150)).unwrap();

        assert_eq!(first.report.accuracy, second.report.accuracy);
        assert_eq!(first.report.confusion, second.report.confusion);
    }

    #[test]
    fn test_saved_model_round_trips() {
        let trainer = Trainer::new(test_config());
        let outcome = trainer.run(synthetic_dataset(150)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraud_gbdt.model");
        outcome.model.save(&path).unwrap();

        let reloaded = FraudModel::load(&path).unwrap();
        for features in [
            vec![5000.0, 30.0, 0.0],
            vec![100.0, 800.0, 1.0],
            vec![8500.0, 10.0, 0.0],
        ] {
            let a = outcome.model.predict(&features);
            let b = reloaded.predict(&features);
            assert_eq!(a.label, b.label);
            assert!((a.probability - b.probability).abs() < 1e-9);
        }
    }

    #[test]
    fn test_prediction_labels_follow_the_data() {
        let trainer = Trainer::new(test_config());
        let outcome = trainer.run(synthetic_dataset(150)).unwrap();

        let fraud = outcome.model.predict(&[7000.0, 20.0, 0.0]);
        let safe = outcome.model.predict(&[50.0, 2500.0, 1.0]);
        assert_eq!(fraud.label, 1);
        assert_eq!(safe.label, 0);
        assert!(fraud.probability > safe.probability);
    }
}
