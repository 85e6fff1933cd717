//! Batch configuration.

use std::path::PathBuf;

use plantseg_ml_client::MlClientConfig;

/// Batch configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Inference client settings
    pub client: MlClientConfig,
    /// Maximum requests in flight; 1 submits strictly one image at a time
    pub max_in_flight: usize,
    /// Directory the xlsx report is written to
    pub output_dir: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            client: MlClientConfig::default(),
            max_in_flight: 1,
            output_dir: PathBuf::from("."),
        }
    }
}

impl BatchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            client: MlClientConfig::from_env(),
            max_in_flight: std::env::var("PLANTSEG_MAX_IN_FLIGHT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1),
            output_dir: std::env::var("PLANTSEG_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.max_in_flight, 1);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.client.max_retries, 0);
    }
}
