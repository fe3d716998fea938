//! HTTP response payloads for the prediction API

use serde::{Deserialize, Serialize};

/// Binary verdict attached to every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Safe,
    Fraud,
}

impl Verdict {
    /// Verdict for a model label (0 = legitimate, 1 = fraudulent).
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Verdict::Fraud
        } else {
            Verdict::Safe
        }
    }

    /// Human-readable message shown alongside the verdict.
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Safe => "Transaction appears to be legitimate",
            Verdict::Fraud => "ALERT! Transaction appears suspicious",
        }
    }
}

/// Successful prediction response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// 0 = legitimate, 1 = fraudulent
    pub prediction: u8,
    pub result: Verdict,
    pub message: String,
    /// Class-1 probability from the boosted ensemble
    pub confidence: f64,
}

impl PredictResponse {
    pub fn new(label: u8, probability: f64) -> Self {
        let result = Verdict::from_label(label);
        Self {
            prediction: label,
            result,
            message: result.message().to_string(),
            confidence: probability,
        }
    }
}

/// `/health` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

impl HealthResponse {
    pub fn new(model_loaded: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded,
        }
    }
}

/// Error response body for rejected or failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(serde_json::to_string(&Verdict::Safe).unwrap(), "\"SAFE\"");
        assert_eq!(serde_json::to_string(&Verdict::Fraud).unwrap(), "\"FRAUD\"");
    }

    #[test]
    fn test_predict_response_shape() {
        let response = PredictResponse::new(1, 0.87);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["prediction"], 1);
        assert_eq!(json["result"], "FRAUD");
        assert_eq!(json["confidence"], 0.87);
        assert!(json["message"].as_str().unwrap().contains("suspicious"));
    }

    #[test]
    fn test_safe_label_maps_to_safe_verdict() {
        let response = PredictResponse::new(0, 0.12);
        assert_eq!(response.result, Verdict::Safe);
        assert_eq!(response.message, "Transaction appears to be legitimate");
    }
}
