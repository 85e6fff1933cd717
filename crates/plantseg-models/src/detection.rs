//! Detections returned by the inference service.
//!
//! The service segments three structural parts of a plant:
//!
//! - `Leaf`: leaf blades, measured by area only
//! - `Stem`: stem segments, measured by area and length
//! - `Root`: root system, measured by area and length
//!
//! Any other class label is kept verbatim on the [`Detection`] but ignored by
//! every aggregation. Malformed fields of a single detection degrade to
//! "unknown" or "absent" instead of failing the whole response.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structural plant part recognized by the inference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantPart {
    Leaf,
    Stem,
    Root,
}

impl PlantPart {
    /// All parts, in report column order.
    pub const ALL: [PlantPart; 3] = [PlantPart::Leaf, PlantPart::Stem, PlantPart::Root];

    /// Returns the wire label used by the inference service.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantPart::Leaf => "leaf",
            PlantPart::Stem => "stem",
            PlantPart::Root => "root",
        }
    }

    /// Returns the human-readable label shown in summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlantPart::Leaf => "Листья",
            PlantPart::Stem => "Стебель",
            PlantPart::Root => "Корень",
        }
    }

    /// Position of this part in [`PlantPart::ALL`].
    pub fn index(&self) -> usize {
        match self {
            PlantPart::Leaf => 0,
            PlantPart::Stem => 1,
            PlantPart::Root => 2,
        }
    }

    /// Returns true if a linear length is meaningful for this part.
    ///
    /// Leaves have no single linear measurement, so summaries never report
    /// a leaf length even when the service sends one.
    pub fn has_length(&self) -> bool {
        !matches!(self, PlantPart::Leaf)
    }
}

impl fmt::Display for PlantPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlantPart {
    type Err = PlantPartParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leaf" => Ok(PlantPart::Leaf),
            "stem" => Ok(PlantPart::Stem),
            "root" => Ok(PlantPart::Root),
            _ => Err(PlantPartParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown plant part: {0}")]
pub struct PlantPartParseError(String);

/// One object found by the inference service in an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Raw class label as sent by the service; empty when it was not a string
    #[serde(default, deserialize_with = "lenient_label")]
    pub class: String,
    /// Confidence in [0, 1]; 0 when missing or not a number
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
    /// Segmented area in cm²
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_cm2: Option<f64>,
    /// Skeleton length in cm, absent when the service did not measure one
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub length_cm: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum MaybeNumber {
    Number(f64),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum MaybeLabel {
    Label(String),
    Other(IgnoredAny),
}

/// Numbers pass through; null, strings and any other JSON value become `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MaybeNumber::deserialize(deserializer)? {
        MaybeNumber::Number(n) => Some(n),
        MaybeNumber::Other(_) => None,
    })
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MaybeLabel::deserialize(deserializer)? {
        MaybeLabel::Label(label) => label,
        MaybeLabel::Other(_) => String::new(),
    })
}

impl Detection {
    /// Create a detection with the given class and confidence.
    pub fn new(class: impl Into<String>, confidence: f64) -> Self {
        Self {
            class: class.into(),
            confidence,
            area_cm2: None,
            length_cm: None,
        }
    }

    /// Set the area.
    pub fn with_area(mut self, area_cm2: f64) -> Self {
        self.area_cm2 = Some(area_cm2);
        self
    }

    /// Set the length.
    pub fn with_length(mut self, length_cm: f64) -> Self {
        self.length_cm = Some(length_cm);
        self
    }

    /// Structural part of this detection, or `None` for unrecognized classes.
    pub fn part(&self) -> Option<PlantPart> {
        self.class.parse().ok()
    }

    /// Length if present and numeric.
    pub fn measured_length(&self) -> Option<f64> {
        self.length_cm.filter(|l| !l.is_nan())
    }
}
