//! Batch error types.

use thiserror::Error;

pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Select at least one image")]
    EmptySelection,

    #[error("Failed to read {path}: {source}")]
    ReadImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ML service unhealthy: {0}")]
    Unhealthy(String),
}

impl BatchError {
    pub fn read_image(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadImage {
            path: path.into(),
            source,
        }
    }

    pub fn unhealthy(msg: impl Into<String>) -> Self {
        Self::Unhealthy(msg.into())
    }
}
