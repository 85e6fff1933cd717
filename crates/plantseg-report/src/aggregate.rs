//! Per-class aggregation of one image's detections.
//!
//! Two strategies exist and they intentionally disagree:
//!
//! - [`StatisticalSummary`] averages confidence and sums measurements. Leaf
//!   length is never aggregated.
//! - [`LastWriteWins`] keeps the last detection of each class, retaining the
//!   last length that was actually provided. It treats all classes alike.
//!
//! Detections with a class outside leaf/stem/root are ignored by both.

use plantseg_models::{Detection, PlantPart};

/// Rendered in place of a missing or zero value.
pub const PLACEHOLDER: &str = "—";

/// A reduction of one image's detections, keyed by plant part.
pub trait AggregationStrategy {
    type Output;

    fn aggregate(&self, detections: &[Detection]) -> Self::Output;
}

// ============================================================================
// Display: statistical summary
// ============================================================================

/// Display summary for one plant part.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub part: PlantPart,
    /// Number of detections of this part
    pub count: usize,
    confidence_sum: f64,
    /// Sum of areas, missing areas counted as 0
    pub total_area: f64,
    /// Sum of provided lengths; always `None` for leaves
    pub total_length: Option<f64>,
}

impl ClassSummary {
    fn empty(part: PlantPart) -> Self {
        Self {
            part,
            count: 0,
            confidence_sum: 0.0,
            total_area: 0.0,
            total_length: part.has_length().then_some(0.0),
        }
    }

    fn add(&mut self, detection: &Detection) {
        self.count += 1;
        self.confidence_sum += detection.confidence;
        self.total_area += detection.area_cm2.unwrap_or(0.0);
        if let (Some(total), Some(length)) =
            (self.total_length.as_mut(), detection.measured_length())
        {
            *total += length;
        }
    }

    /// Mean confidence, or `None` when the part was not detected.
    pub fn avg_confidence(&self) -> Option<f64> {
        (self.count > 0).then(|| self.confidence_sum / self.count as f64)
    }

    pub fn format_confidence(&self) -> String {
        match self.avg_confidence() {
            Some(avg) => format!("{:.1}%", avg * 100.0),
            None => PLACEHOLDER.to_string(),
        }
    }

    pub fn format_area(&self) -> String {
        format_positive(Some(self.total_area), "см²")
    }

    pub fn format_length(&self) -> String {
        format_positive(self.total_length, "см")
    }
}

/// Zero and missing are indistinguishable on screen.
fn format_positive(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v > 0.0 => format!("{:.1} {}", v, unit),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Display summaries for leaf, stem and root.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySummary {
    classes: [ClassSummary; 3],
}

impl DisplaySummary {
    pub fn get(&self, part: PlantPart) -> &ClassSummary {
        &self.classes[part.index()]
    }

    /// Summaries in leaf, stem, root order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassSummary> {
        self.classes.iter()
    }
}

/// Mean confidence and summed measurements per class.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalSummary;

impl AggregationStrategy for StatisticalSummary {
    type Output = DisplaySummary;

    fn aggregate(&self, detections: &[Detection]) -> DisplaySummary {
        let mut classes = PlantPart::ALL.map(ClassSummary::empty);

        for detection in detections {
            if let Some(part) = detection.part() {
                classes[part.index()].add(detection);
            }
        }

        DisplaySummary { classes }
    }
}

// ============================================================================
// Export: last write wins
// ============================================================================

/// Exported values for one plant part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartValues {
    /// Confidence in [0, 1] of the last detection
    pub confidence: f64,
    /// Area of the last detection; `None` if it carried no area
    pub area: Option<f64>,
    /// Last provided length, `None` if no detection carried one
    pub length: Option<f64>,
}

impl Default for PartValues {
    fn default() -> Self {
        Self {
            confidence: 0.0,
            area: Some(0.0),
            length: None,
        }
    }
}

impl PartValues {
    /// Confidence as a percentage rounded to one decimal place.
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 1000.0).round() / 10.0
    }
}

/// Exported values for leaf, stem and root.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExportValues {
    parts: [PartValues; 3],
}

impl ExportValues {
    pub fn get(&self, part: PlantPart) -> &PartValues {
        &self.parts[part.index()]
    }
}

/// Keeps the last detection of each class.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriteWins;

impl AggregationStrategy for LastWriteWins {
    type Output = ExportValues;

    fn aggregate(&self, detections: &[Detection]) -> ExportValues {
        let mut values = ExportValues::default();

        for detection in detections {
            let Some(part) = detection.part() else {
                continue;
            };
            let slot = &mut values.parts[part.index()];
            slot.confidence = detection.confidence;
            slot.area = detection.area_cm2;
            if let Some(length) = detection.length_cm {
                slot.length = Some(length);
            }
        }

        values
    }
}
