use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::EnvFilter;

/// Install the global tracing subscriber using the configured log level.
///
/// Intended to be called once at process start; a second call reports
/// [`TelemetryError::AlreadyInitialized`].
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|source| TelemetryError::InvalidFilter { source })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInitialized)?;

    Ok(())
}

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter {
        source: tracing_subscriber::filter::ParseError,
    },
    AlreadyInitialized,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { .. } => {
                write!(f, "APP_LOG_LEVEL must be a valid tracing filter directive")
            }
            TelemetryError::AlreadyInitialized => {
                write!(f, "tracing subscriber was already installed")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source } => Some(source),
            TelemetryError::AlreadyInitialized => None,
        }
    }
}
