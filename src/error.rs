use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropOpsError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("{0} did not respond within {1:?}")]
    Timeout(&'static str, Duration),

    #[error("Invalid pincode '{0}': expected 6 digits not starting with 0")]
    InvalidPincode(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, CropOpsError>;
