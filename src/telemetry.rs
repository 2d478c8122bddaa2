use crate::config::TelemetryConfig;
use std::env;
use std::fmt;
use std::io::IsTerminal;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "rh_intake";

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directives: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, .. } => {
                write!(f, "invalid log filter '{directives}'")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "log subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. Events go to stderr so stdout carries only command
/// output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let directives = filter_directives(env::var("RUST_LOG").ok(), &config.log_level);
    let env_filter =
        EnvFilter::try_new(&directives).map_err(|source| TelemetryError::InvalidFilter {
            directives: directives.clone(),
            source,
        })?;

    let stderr = std::io::stderr();
    let ansi = stderr.is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(ansi)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

/// `RUST_LOG` wins when set. Otherwise dependencies stay at `warn` and the configured
/// level applies to this crate only; a value that already names targets is used as-is.
fn filter_directives(rust_log: Option<String>, log_level: &str) -> String {
    if let Some(explicit) = rust_log.filter(|value| !value.trim().is_empty()) {
        return explicit;
    }

    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,{CRATE_TARGET}={level}")
    }
}
