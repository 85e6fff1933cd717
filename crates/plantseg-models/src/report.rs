//! Per-image results and the ordered batch report.

use serde::{Deserialize, Serialize};

use crate::detection::Detection;

/// Outcome of submitting one image.
///
/// Exactly one of `detections` or `error` is meaningful: `error` is set when
/// the request failed, otherwise `detections` holds the (possibly empty)
/// service output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub file_name: String,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageResult {
    /// Successful request, possibly with zero detections.
    pub fn success(file_name: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            file_name: file_name.into(),
            detections,
            error: None,
        }
    }

    /// Failed request. Detections are left empty.
    pub fn failure(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            detections: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if the request succeeded and found at least one object.
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}

/// Ordered results of one batch, one entry per submitted image.
///
/// Position is the only correlation key between a result and its source
/// image, so the order always matches submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchReport {
    results: Vec<ImageResult>,
}

impl BatchReport {
    pub fn new(results: Vec<ImageResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[ImageResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns true if any image has at least one detection.
    pub fn has_detections(&self) -> bool {
        self.results.iter().any(ImageResult::has_detections)
    }

    /// Number of images whose request failed.
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}

impl FromIterator<ImageResult> for BatchReport {
    fn from_iter<I: IntoIterator<Item = ImageResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BatchReport {
    type Item = &'a ImageResult;
    type IntoIter = std::slice::Iter<'a, ImageResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
