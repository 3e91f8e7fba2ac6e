use thiserror::Error;

use crate::config::ConfigError;

/// Bootstrap-path failures: everything that can stop the process before or
/// while it serves. Request-scoped failures go through `infra::http::error`.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {message}")]
    Database { message: String },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

impl From<ConfigError> for InfraError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}
