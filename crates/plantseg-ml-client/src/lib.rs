//! Client for the PlantSeg inference service.
//!
//! The service segments leaves, stems and roots in a single image and
//! returns one detection per object with physical measurements. This crate
//! wraps the `/predict` endpoint and exposes it through the [`Predictor`]
//! trait so batch orchestration can be tested without a live service.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MlClientConfig, PredictClient, Predictor};
pub use error::{MlError, MlResult};
pub use types::{ErrorBody, HealthResponse, PredictResponse};
