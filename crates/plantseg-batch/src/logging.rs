//! Structured batch logging.
//!
//! Every event carries the batch ID, so the per-image lines of one run can be
//! correlated even when several requests are in flight.

use plantseg_models::{BatchReport, ImageResult};
use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Outcome label of one image, emitted as the `status` field.
pub fn image_status(result: &ImageResult) -> &'static str {
    if result.is_error() {
        "failed"
    } else if result.has_detections() {
        "ok"
    } else {
        "empty"
    }
}

/// Logger for one batch run.
#[derive(Debug, Clone)]
pub struct BatchLogger {
    batch_id: String,
}

impl BatchLogger {
    pub fn new(batch_id: &Uuid) -> Self {
        Self {
            batch_id: batch_id.to_string(),
        }
    }

    /// Log the start of a batch.
    ///
    /// `scale` is the value actually sent; `None` means the service default.
    pub fn log_start(&self, total: usize, scale: Option<f64>, max_in_flight: usize) {
        info!(
            batch_id = %self.batch_id,
            images = total,
            scale = ?scale,
            max_in_flight,
            "Batch started"
        );
    }

    /// Log the outcome of the image at `index` (0-based) out of `total`.
    pub fn log_image(&self, index: usize, total: usize, result: &ImageResult) {
        let status = image_status(result);
        match &result.error {
            Some(err) => warn!(
                batch_id = %self.batch_id,
                index = index + 1,
                total,
                file_name = %result.file_name,
                status,
                error = %err,
                "Image failed"
            ),
            None => info!(
                batch_id = %self.batch_id,
                index = index + 1,
                total,
                file_name = %result.file_name,
                status,
                detections = result.detections.len(),
                "Image processed"
            ),
        }
    }

    /// Log the end of a batch. Escalates to error level when no image succeeded.
    pub fn log_completion(&self, report: &BatchReport) {
        let failed = report.error_count();
        let with_detections = report.iter().filter(|r| r.has_detections()).count();

        if failed == report.len() {
            error!(
                batch_id = %self.batch_id,
                images = report.len(),
                failed,
                "Batch completed, every image failed"
            );
        } else {
            info!(
                batch_id = %self.batch_id,
                images = report.len(),
                failed,
                with_detections,
                "Batch completed"
            );
        }
    }

    /// Create a tracing span for this batch.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("batch", batch_id = %self.batch_id)
    }
}
