//! Expected-feature schema and coercion of untrusted prediction input.
//!
//! Every serving path (JSON body, form fields, uploaded file) funnels its
//! parsed key/value pairs through [`FeatureSchema::coerce`], which validates
//! the field set and produces the feature vector in trained column order.

use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Features the persisted model was trained on, in trained column order.
pub const EXPECTED_FEATURES: [&str; 11] = [
    "transaction_amount",
    "account_age_days",
    "daily_transaction_amount",
    "total_daily_transactions",
    "transaction_frequency",
    "transaction_frequency_same_account",
    "account_type_personal",
    "payment_type_debit",
    "transaction_type_bank_transfer",
    "transaction_type_Deposit",
    "transaction_type_sporty",
];

/// Features carrying a boolean encoded as 0/1.
pub const BOOLEAN_FEATURES: [&str; 5] = [
    "account_type_personal",
    "payment_type_debit",
    "transaction_type_bank_transfer",
    "transaction_type_Deposit",
    "transaction_type_sporty",
];

/// Identifier fields clients may send along; the trainer drops these columns,
/// so they are accepted and ignored here.
pub const IGNORED_FIELDS: [&str; 4] = [
    "account_id",
    "receiver_account_id",
    "transaction_id",
    "timestamp",
];

/// Why a prediction input was rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object of feature values")]
    NotAnObject,
    #[error("Missing columns in input data: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    #[error("Unexpected fields in input data: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
    #[error("Field `{field}` is not numeric: {value}")]
    NotNumeric { field: String, value: String },
}

/// Validates untrusted inputs against the trained feature set.
pub struct FeatureSchema;

impl FeatureSchema {
    pub fn new() -> Self {
        Self
    }

    /// Number of features the model expects.
    pub fn feature_count(&self) -> usize {
        EXPECTED_FEATURES.len()
    }

    /// Expected feature names in trained column order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &EXPECTED_FEATURES
    }

    /// Whether a feature carries a 0/1 boolean.
    pub fn is_boolean(&self, name: &str) -> bool {
        BOOLEAN_FEATURES.contains(&name)
    }

    /// Validate a parsed JSON object and coerce it into the model's feature
    /// vector.
    ///
    /// Boolean-marked features map {true, "True", "true", 1, "1"} to 1 and
    /// everything else to 0. Remaining features must be numbers or numeric
    /// strings; anything else is rejected rather than silently zeroed, since
    /// a zeroed amount would read as a false "safe" verdict downstream.
    pub fn coerce(&self, input: &Map<String, Value>) -> Result<Vec<f32>, ValidationError> {
        let mut unknown: Vec<String> = input
            .keys()
            .filter(|k| {
                !EXPECTED_FEATURES.contains(&k.as_str()) && !IGNORED_FIELDS.contains(&k.as_str())
            })
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(ValidationError::UnknownFields(unknown));
        }

        let missing: Vec<String> = EXPECTED_FEATURES
            .iter()
            .filter(|name| !input.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFeatures(missing));
        }

        EXPECTED_FEATURES
            .iter()
            .map(|&name| {
                let value = &input[name];
                if self.is_boolean(name) {
                    Ok(if truthy(value) { 1.0 } else { 0.0 })
                } else {
                    numeric(name, value)
                }
            })
            .collect()
    }

    /// Coerce string-valued fields (form submissions) through the same path.
    pub fn coerce_strings(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<Vec<f32>, ValidationError> {
        let map: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        self.coerce(&map)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// The truthy encodings recognized for boolean features.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "True" || s == "true" || s == "1",
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

fn numeric(field: &str, value: &Value) -> Result<f32, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n as f32),
        _ => Err(ValidationError::NotNumeric {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}
