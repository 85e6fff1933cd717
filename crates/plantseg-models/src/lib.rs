//! Shared data models for the PlantSeg batch client.
//!
//! This crate provides Serde-serializable types for:
//! - Source images selected for analysis
//! - Detections returned by the inference service
//! - Per-image results and the ordered batch report
//! - Plant type classification from file names

pub mod detection;
pub mod image;
pub mod plant_type;
pub mod report;

// Re-export common types
pub use detection::{Detection, PlantPart, PlantPartParseError};
pub use image::{is_supported_image, SourceImage, SUPPORTED_EXTENSIONS};
pub use plant_type::{classify, UNKNOWN_PLANT};
pub use report::{BatchReport, ImageResult};
