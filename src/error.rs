use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::intake::{ExportError, StoreError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Store(StoreError),
    Export(ExportError),
    Input(String),
}

impl AppError {
    /// Short tag for the notification line shown to the operator.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "configuration",
            AppError::Telemetry(_) => "telemetry",
            AppError::Io(_) => "io",
            AppError::Store(StoreError::Validation(_)) => "validation",
            AppError::Store(StoreError::NotFound(_)) => "not found",
            AppError::Store(StoreError::Format(_)) => "format",
            AppError::Store(StoreError::Persistence(_)) => "persistence",
            AppError::Store(StoreError::IdsExhausted(_)) => "capacity",
            AppError::Export(_) => "export",
            AppError::Input(_) => "input",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Export(ExportError::Json(value))
    }
}
