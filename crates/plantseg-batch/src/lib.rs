//! Batch submission of plant images.
//!
//! This crate provides:
//! - Image selection (supported formats, batch size cap)
//! - Batch orchestration against the inference service
//! - Terminal rendering of per-image summaries
//! - Structured batch logging

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod render;
pub mod selection;

pub use config::BatchConfig;
pub use error::{BatchError, BatchResult};
pub use logging::BatchLogger;
pub use orchestrator::{parse_scale, BatchOrchestrator};
pub use render::render_report;
pub use selection::{load_images, select_images, Selection, MAX_BATCH_SIZE};
