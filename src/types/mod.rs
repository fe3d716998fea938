//! Type definitions for the fraud detection service

pub mod response;

pub use response::{ErrorResponse, HealthResponse, PredictResponse, Verdict};
