//! ML service request/response types.

use plantseg_models::Detection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field carrying the image bytes.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the pixels-per-centimetre scale.
pub const SCALE_FIELD: &str = "scale";

/// Response from `/predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    /// One entry per detected object; absent or null means nothing found
    #[serde(default)]
    pub predictions: Option<Vec<Detection>>,
}

impl PredictResponse {
    pub fn into_detections(self) -> Vec<Detection> {
        self.predictions.unwrap_or_default()
    }
}

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Parse an error body, tolerating non-JSON payloads.
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Human-readable detail message.
    ///
    /// String details are used as-is; structured details (validation error
    /// lists) are rendered as compact JSON. Empty details count as absent.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
