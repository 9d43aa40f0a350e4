use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Logging setup error: {0}")]
    Logging(#[from] log::SetLoggerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The only failure a sensor worker can report. Transport errors and
/// non-success responses are folded into the same variant.
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Sensor call to {endpoint} failed: {reason}")]
    CallFailed { endpoint: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

// Helper functions for creating errors
impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}

impl SensorError {
    pub fn call_failed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        SensorError::CallFailed {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
