//! ML client error types.

use thiserror::Error;

pub type MlResult<T> = Result<T, MlError>;

#[derive(Debug, Error)]
pub enum MlError {
    /// Non-success HTTP status. `detail` is the server-supplied message, if any.
    #[error("Request failed with status code {status}")]
    Api { status: u16, detail: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MlError {
    pub fn is_retryable(&self) -> bool {
        match self {
            MlError::Timeout(_) | MlError::Network(_) => true,
            MlError::Api { status, .. } => *status >= 500,
            MlError::InvalidResponse(_) => false,
        }
    }

    /// Most specific message available for showing next to the image.
    ///
    /// Prefers the server's `detail` over the transport-level message.
    pub fn user_message(&self) -> String {
        match self {
            MlError::Api {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = MlError::Api {
            status: 422,
            detail: Some("Unsupported image format".to_string()),
        };
        assert_eq!(err.user_message(), "Unsupported image format");

        let err = MlError::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 500");
    }

    #[test]
    fn test_retryable() {
        assert!(MlError::Timeout(30).is_retryable());
        assert!(MlError::Api { status: 503, detail: None }.is_retryable());
        assert!(!MlError::Api { status: 400, detail: None }.is_retryable());
        assert!(!MlError::InvalidResponse("bad".into()).is_retryable());
    }
}
