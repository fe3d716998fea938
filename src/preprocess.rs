//! Dataset preprocessing: identifier stripping, label encoding, target
//! detection, and the stratified train/test split.

use crate::dataset::{Cell, Dataset};
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

/// Columns that identify a record rather than describe it. Dropped before
/// training when present.
pub const IDENTIFIER_COLUMNS: [&str; 4] = [
    "account_id",
    "receiver_account_id",
    "timestamp",
    "transaction_id",
];

/// Column names recognized as the classification target, in priority order.
/// Falls back to the last column when none is present.
pub const TARGET_CANDIDATES: [&str; 5] = ["is_fraud", "fraud", "label", "target", "Outcome"];

/// Maps category strings to stable integer codes (sorted lexicographically,
/// so codes are independent of row order).
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder over the given values.
    pub fn fit<'a, I: IntoIterator<Item = &'a str>>(values: I) -> Self {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Code for a value seen during `fit`.
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    /// Number of distinct classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Encoded feature matrix with its binary target, ready for training.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f32>>,
    pub labels: Vec<u8>,
}

/// Train/test partition of a [`Prepared`] dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train_features: Vec<Vec<f32>>,
    pub train_labels: Vec<u8>,
    pub test_features: Vec<Vec<f32>>,
    pub test_labels: Vec<u8>,
}

/// Preprocess a raw dataset into an encoded feature matrix and binary target.
///
/// Mirrors the training contract: identifier columns are dropped, rows with
/// missing cells are discarded, text columns are label-encoded, and the
/// target column is detected by name (last column as fallback).
pub fn prepare(mut dataset: Dataset) -> Result<Prepared> {
    let dropped_cols = dataset.drop_columns(&IDENTIFIER_COLUMNS);
    if dropped_cols > 0 {
        info!(count = dropped_cols, "Dropped identifier columns");
    }

    let dropped_rows = dataset.drop_missing_rows();
    if dropped_rows > 0 {
        warn!(count = dropped_rows, "Dropped rows with missing values");
    }

    if dataset.is_empty() {
        bail!("Dataset is empty after preprocessing");
    }

    let target_idx = match TARGET_CANDIDATES
        .iter()
        .find_map(|name| dataset.column_index(name))
    {
        Some(idx) => idx,
        None => {
            let last = dataset.columns.len() - 1;
            info!(column = %dataset.columns[last], "No known target name, using last column");
            last
        }
    };
    info!(target = %dataset.columns[target_idx], "Target column selected");

    let labels = encode_target(&dataset, target_idx)?;

    let feature_indices: Vec<usize> =
        (0..dataset.columns.len()).filter(|&i| i != target_idx).collect();
    let feature_names: Vec<String> = feature_indices
        .iter()
        .map(|&i| dataset.columns[i].clone())
        .collect();

    // A column holding any text cell is treated as categorical and encoded
    // over the string form of every cell, matching astype(str) semantics.
    let mut encoders: Vec<Option<LabelEncoder>> = Vec::with_capacity(feature_indices.len());
    for &col in &feature_indices {
        let is_categorical = dataset.rows.iter().any(|row| matches!(row[col], Cell::Text(_)));
        if is_categorical {
            let values: Vec<String> = dataset.rows.iter().map(|row| cell_str(&row[col])).collect();
            let encoder = LabelEncoder::fit(values.iter().map(String::as_str));
            info!(
                column = %dataset.columns[col],
                classes = encoder.class_count(),
                "Label-encoded categorical column"
            );
            encoders.push(Some(encoder));
        } else {
            encoders.push(None);
        }
    }

    let mut features = Vec::with_capacity(dataset.rows.len());
    for row in &dataset.rows {
        let mut encoded = Vec::with_capacity(feature_indices.len());
        for (slot, &col) in feature_indices.iter().enumerate() {
            let value = match (&encoders[slot], &row[col]) {
                (Some(encoder), cell) => {
                    // Values were collected during fit, so transform cannot miss.
                    encoder.transform(&cell_str(cell)).unwrap_or(0) as f32
                }
                (None, Cell::Number(n)) => *n as f32,
                (None, _) => unreachable!("missing cells were dropped"),
            };
            encoded.push(value);
        }
        features.push(encoded);
    }

    info!(
        rows = features.len(),
        features = feature_names.len(),
        positives = labels.iter().filter(|&&l| l == 1).count(),
        "Preprocessing complete"
    );

    Ok(Prepared {
        feature_names,
        features,
        labels,
    })
}

fn cell_str(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Missing => String::new(),
    }
}

/// Encode the target column as 0/1, label-encoding text targets first.
fn encode_target(dataset: &Dataset, target_idx: usize) -> Result<Vec<u8>> {
    let raw: Vec<f64> = if dataset
        .rows
        .iter()
        .any(|row| matches!(row[target_idx], Cell::Text(_)))
    {
        let values: Vec<String> = dataset
            .rows
            .iter()
            .map(|row| cell_str(&row[target_idx]))
            .collect();
        let encoder = LabelEncoder::fit(values.iter().map(String::as_str));
        values
            .iter()
            .map(|v| encoder.transform(v).unwrap_or(0) as f64)
            .collect()
    } else {
        dataset
            .rows
            .iter()
            .map(|row| match &row[target_idx] {
                Cell::Number(n) => *n,
                _ => 0.0,
            })
            .collect()
    };

    let mut distinct: Vec<f64> = raw.clone();
    distinct.sort_by(|a, b| a.partial_cmp(b).expect("target values are finite"));
    distinct.dedup();

    match distinct.len() {
        0 | 1 => bail!("Target column has a single class; nothing to learn"),
        2 => {
            let positive = distinct[1];
            Ok(raw.iter().map(|&v| u8::from(v == positive)).collect())
        }
        n => bail!("Expected a binary target, found {} classes", n),
    }
}

/// Split per class so both partitions keep the dataset's class balance.
pub fn stratified_split(prepared: &Prepared, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_size) {
        bail!("test_size must be in [0, 1), got {}", test_size);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = TrainTestSplit {
        train_features: Vec::new(),
        train_labels: Vec::new(),
        test_features: Vec::new(),
        test_labels: Vec::new(),
    };

    for class in [0u8, 1u8] {
        let mut indices: Vec<usize> = prepared
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            continue;
        }

        indices.shuffle(&mut rng);
        let test_count = ((indices.len() as f64 * test_size).round() as usize).min(indices.len() - 1);

        for (pos, &idx) in indices.iter().enumerate() {
            if pos < test_count {
                split.test_features.push(prepared.features[idx].clone());
                split.test_labels.push(prepared.labels[idx]);
            } else {
                split.train_features.push(prepared.features[idx].clone());
                split.train_labels.push(prepared.labels[idx]);
            }
        }
    }

    if split.train_features.is_empty() || split.test_features.is_empty() {
        bail!("Dataset too small for a {}-fraction held-out split", test_size);
    }

    info!(
        train = split.train_features.len(),
        test = split.test_features.len(),
        "Stratified split complete"
    );

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    const SAMPLE: &str = "\
account_id,amount,account_type_personal,is_fraud
1,100.0,True,0
2,9000.0,False,1
3,150.0,True,0
4,,True,0
5,8000.0,False,1
6,120.0,True,0
";

    #[test]
    fn test_label_encoder_sorted_codes() {
        let encoder = LabelEncoder::fit(["beta", "alpha", "beta", "gamma"]);
        assert_eq!(encoder.class_count(), 3);
        assert_eq!(encoder.transform("alpha"), Some(0));
        assert_eq!(encoder.transform("beta"), Some(1));
        assert_eq!(encoder.transform("gamma"), Some(2));
        assert_eq!(encoder.transform("delta"), None);
    }

    #[test]
    fn test_prepare_drops_ids_and_encodes() {
        let dataset = Dataset::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        let prepared = prepare(dataset).unwrap();

        assert_eq!(prepared.feature_names, vec!["amount", "account_type_personal"]);
        // Row 4 had a missing amount and must be gone.
        assert_eq!(prepared.features.len(), 5);
        assert_eq!(prepared.labels, vec![0, 1, 0, 1, 0]);
        // False < True lexicographically, so False=0 / True=1.
        assert_eq!(prepared.features[0][1], 1.0);
        assert_eq!(prepared.features[1][1], 0.0);
    }

    #[test]
    fn test_prepare_falls_back_to_last_column() {
        let csv = "a,b,outcome_flag\n1,2,0\n3,4,1\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        let prepared = prepare(dataset).unwrap();
        assert_eq!(prepared.feature_names, vec!["a", "b"]);
        assert_eq!(prepared.labels, vec![0, 1]);
    }

    #[test]
    fn test_prepare_rejects_single_class() {
        let csv = "a,is_fraud\n1,0\n2,0\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert!(prepare(dataset).is_err());
    }

    fn synthetic_prepared(rows: usize, positives: usize) -> Prepared {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..rows {
            let label = u8::from(i < positives);
            features.push(vec![i as f32, label as f32 * 10.0]);
            labels.push(label);
        }
        Prepared {
            feature_names: vec!["f0".to_string(), "f1".to_string()],
            features,
            labels,
        }
    }

    #[test]
    fn test_stratified_split_keeps_class_balance() {
        let prepared = synthetic_prepared(100, 20);
        let split = stratified_split(&prepared, 0.2, 42).unwrap();

        assert_eq!(split.test_features.len(), 20);
        assert_eq!(split.train_features.len(), 80);
        assert_eq!(split.test_labels.iter().filter(|&&l| l == 1).count(), 4);
        assert_eq!(split.train_labels.iter().filter(|&&l| l == 1).count(), 16);
    }

    #[test]
    fn test_stratified_split_is_deterministic() {
        let prepared = synthetic_prepared(50, 10);
        let a = stratified_split(&prepared, 0.2, 7).unwrap();
        let b = stratified_split(&prepared, 0.2, 7).unwrap();
        assert_eq!(a.train_features, b.train_features);
        assert_eq!(a.test_labels, b.test_labels);
    }
}
