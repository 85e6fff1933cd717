//! ML service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use plantseg_models::{Detection, SourceImage};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{ErrorBody, HealthResponse, PredictResponse, FILE_FIELD, SCALE_FIELD};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service (without `/predict`)
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retries per image for retryable failures, 0 disables retrying
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries
    pub retry_base_delay: Duration,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 0,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PLANTSEG_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("PLANTSEG_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("PLANTSEG_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            ..Default::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Something that can run inference on a single image.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Detect plant parts in one image.
    ///
    /// `scale` is the pixels-per-centimetre factor; `None` lets the service
    /// apply its own default.
    async fn predict(&self, image: &SourceImage, scale: Option<f64>) -> MlResult<Vec<Detection>>;
}

/// Client for the inference service.
pub struct PredictClient {
    http: Client,
    config: MlClientConfig,
}

impl PredictClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    /// Check if ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = self.config.endpoint("health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Submit one image to `/predict` without retrying.
    async fn predict_once(
        &self,
        image: &SourceImage,
        scale: Option<f64>,
    ) -> MlResult<PredictResponse> {
        let url = self.config.endpoint("predict");

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())
            .map_err(MlError::Network)?;
        let mut form = Form::new().part(FILE_FIELD, part);
        if let Some(scale) = scale {
            form = form.text(SCALE_FIELD, scale.to_string());
        }

        debug!(file_name = %image.file_name, ?scale, "Sending predict request to {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !status.is_success() {
            return Err(MlError::Api {
                status: status.as_u16(),
                detail: ErrorBody::parse(&body).detail_message(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| MlError::InvalidResponse(e.to_string()))
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> MlError {
        if e.is_timeout() {
            MlError::Timeout(self.config.timeout.as_secs())
        } else {
            MlError::Network(e)
        }
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MlResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MlResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self
                        .config
                        .retry_base_delay
                        .saturating_mul(2u32.saturating_pow(attempt));
                    warn!(
                        "ML request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl Predictor for PredictClient {
    async fn predict(&self, image: &SourceImage, scale: Option<f64>) -> MlResult<Vec<Detection>> {
        let response = self
            .with_retry(|| self.predict_once(image, scale))
            .await?;
        Ok(response.into_detections())
    }
}
