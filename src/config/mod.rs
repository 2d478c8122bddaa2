use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::intake::SeedPolicy;

const DEFAULT_DATA_PATH: &str = "rh_candidates.json";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let seed_sample = match env::var("APP_SEED_SAMPLE") {
            Ok(raw) => parse_flag("APP_SEED_SAMPLE", &raw)?,
            Err(_) => true,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_path,
                seed_sample,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Where candidate records live and how an empty store is initialized.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_path: PathBuf,
    pub seed_sample: bool,
}

impl StorageConfig {
    pub fn seed_policy(&self) -> SeedPolicy {
        if self.seed_sample {
            SeedPolicy::Sample
        } else {
            SeedPolicy::Empty
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean (true/false), found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
