//! Request handlers for the prediction API.

use super::AppState;
use crate::types::{ErrorResponse, HealthResponse, PredictResponse};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn server_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}

/// `GET /` - minimal status page listing the API surface.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let model_status = if state.model_loaded() {
        "loaded"
    } else {
        "not loaded"
    };
    let served = state.metrics.predictions_total.load(Ordering::Relaxed);
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Kenam Fraud Detection API</title></head>\n<body>\n\
         <h1>Kenam Fraud Detection API</h1>\n\
         <p>Model: {model_status} | Uptime: {uptime_secs}s | Predictions served: {served}</p>\n\
         <ul>\n\
         <li><code>GET /health</code> - health check</li>\n\
         <li><code>POST /predict</code> - JSON body of feature values</li>\n\
         <li><code>POST /predict/form</code> - urlencoded form fields</li>\n\
         <li><code>POST /predict/upload</code> - uploaded JSON file content</li>\n\
         </ul>\n</body>\n</html>\n"
    ))
}

/// `GET /health` - liveness plus whether the model artifact was loaded.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(state.model_loaded()))
}

/// `POST /predict` - JSON body of feature values.
pub async fn predict(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<PredictResponse>, ApiError> {
    predict_from_text(&state, &body)
}

/// `POST /predict/upload` - the raw content of an uploaded JSON file.
pub async fn predict_upload(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<PredictResponse>, ApiError> {
    predict_from_text(&state, &body)
}

/// `POST /predict/form` - urlencoded form fields, coerced from strings.
pub async fn predict_form(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let map: serde_json::Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    run_prediction(&state, &map)
}

fn predict_from_text(state: &AppState, body: &str) -> Result<Json<PredictResponse>, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        state.metrics.record_validation_failure();
        bad_request(format!("Invalid JSON body: {}", e))
    })?;

    let Value::Object(input) = value else {
        state.metrics.record_validation_failure();
        return Err(bad_request(
            "Request body must be a JSON object of feature values",
        ));
    };

    run_prediction(state, &input)
}

fn run_prediction(
    state: &AppState,
    input: &serde_json::Map<String, Value>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Some(model) = state.model.as_ref() else {
        return Err(server_error(
            "Model not loaded. Run kenam-train to produce the model artifact.",
        ));
    };

    let features = state.schema.coerce(input).map_err(|e| {
        state.metrics.record_validation_failure();
        warn!(error = %e, "Rejected prediction input");
        bad_request(e.to_string())
    })?;

    let start = Instant::now();
    let prediction = model.predict(&features);
    state
        .metrics
        .record_prediction(start.elapsed(), prediction.label);

    debug!(
        label = prediction.label,
        probability = prediction.probability,
        "Prediction served"
    );

    Ok(Json(PredictResponse::new(
        prediction.label,
        prediction.probability,
    )))
}
