//! Batch orchestration against the inference service.
//!
//! Each image gets one `/predict` call. A failed call is recorded on that
//! image's result and the batch moves on; nothing short of an empty
//! selection aborts a run. Results are assembled in submission order even
//! when several requests are in flight.

use futures::stream::{self, StreamExt};
use plantseg_ml_client::Predictor;
use plantseg_models::{BatchReport, ImageResult, SourceImage};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::error::{BatchError, BatchResult};
use crate::logging::BatchLogger;

/// Parse user scale input (pixels per centimetre).
///
/// Empty, non-numeric, non-finite and non-positive input yields `None`, in
/// which case the service falls back to its default of 93.8 px/cm.
pub fn parse_scale(input: Option<&str>) -> Option<f64> {
    let value: f64 = input?.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Submits images to a [`Predictor`] and collects an ordered report.
pub struct BatchOrchestrator<P> {
    predictor: P,
    max_in_flight: usize,
}

impl<P: Predictor> BatchOrchestrator<P> {
    /// Create an orchestrator that submits one image at a time.
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            max_in_flight: 1,
        }
    }

    /// Allow up to `max_in_flight` concurrent requests (minimum 1).
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Run every image through the predictor.
    ///
    /// The report has exactly one entry per image, in input order, and is
    /// returned only after every image was attempted.
    pub async fn run_batch(
        &self,
        images: &[SourceImage],
        scale: Option<&str>,
    ) -> BatchResult<BatchReport> {
        if images.is_empty() {
            return Err(BatchError::EmptySelection);
        }

        let scale = parse_scale(scale);
        let logger = BatchLogger::new(&Uuid::new_v4());
        let span = logger.create_span();
        let total = images.len();

        let report = async {
            let logger = &logger;
            logger.log_start(total, scale, self.max_in_flight);

            let results: Vec<ImageResult> = stream::iter(images.iter().enumerate())
                .map(|(index, image)| async move {
                    let result = self.process_image(image, scale).await;
                    logger.log_image(index, total, &result);
                    result
                })
                .buffered(self.max_in_flight)
                .collect()
                .await;

            let report = BatchReport::new(results);
            logger.log_completion(&report);
            report
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    async fn process_image(&self, image: &SourceImage, scale: Option<f64>) -> ImageResult {
        match self.predictor.predict(image, scale).await {
            Ok(detections) => ImageResult::success(image.file_name.clone(), detections),
            Err(e) => {
                debug!(file_name = %image.file_name, error = ?e, "Predict request failed");
                ImageResult::failure(image.file_name.clone(), e.user_message())
            }
        }
    }
}
