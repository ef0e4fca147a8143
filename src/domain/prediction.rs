// ============================================================
// Layer 3 - Prediction Contract
// ============================================================
// The request/response shapes exchanged with whatever serves
// predictions, plus the fixed decision rule that turns a
// probability into a verdict.
//
//   score > 0.5  -> Defacement (Malicious)
//   score <= 0.5 -> Benign (Safe)
//
// The threshold is a constant. It is never learned and never
// overridden per request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scores strictly above this value are classified as malicious.
pub const DECISION_THRESHOLD: f32 = 0.5;

pub const BENIGN_LABEL:    &str = "Benign (Safe)";
pub const MALICIOUS_LABEL: &str = "Defacement (Malicious)";

/// Apply the decision rule to a classifier probability.
pub fn is_malicious(score: f32) -> bool {
    score > DECISION_THRESHOLD
}

/// Human-readable label for a verdict.
pub fn label_for(malicious: bool) -> &'static str {
    if malicious { MALICIOUS_LABEL } else { BENIGN_LABEL }
}

/// Incoming request: `{"url": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub url: String,
}

impl PredictionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Outgoing response. `url` is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub url:              String,
    pub prediction_score: f32,
    pub label:            String,
    pub is_malicious:     bool,
}

impl PredictionResponse {
    /// Build a response from the raw classifier probability.
    pub fn from_score(url: impl Into<String>, score: f32) -> Self {
        let malicious = is_malicious(score);
        Self {
            url:              url.into(),
            prediction_score: score,
            label:            label_for(malicious).to_string(),
            is_malicious:     malicious,
        }
    }
}

/// Failures at the request boundary.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("URL cannot be empty")]
    EmptyUrl,

    #[error("Model is not loaded")]
    NotLoaded,

    #[error("Scoring failed: {0}")]
    Scoring(String),
}

impl PredictError {
    /// True when the caller sent bad input (HTTP 400 territory);
    /// false for failures on the serving side (HTTP 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::EmptyUrl)
    }
}
