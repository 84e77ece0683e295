//! Log subscriber setup
//!
//! Terraform captures plugin stderr and filters it by `TF_LOG`, so the
//! subscriber writes plain text to stderr at the level the user asked for.

use thiserror::Error;
use tracing::Level;

pub const ENV_TF_LOG: &str = "TF_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Level requested through `TF_LOG`; `Off` installs nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a `TF_LOG` value. Unknown values fall back to `Info`, matching
    /// how Terraform treats any non-empty setting as "enable logging".
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Off;
        };

        match value.to_ascii_uppercase().as_str() {
            "OFF" => Self::Off,
            "ERROR" => Self::Error,
            "WARN" => Self::Warn,
            "INFO" => Self::Info,
            "DEBUG" => Self::Debug,
            "TRACE" | "JSON" => Self::Trace,
            _ => Self::Info,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENV_TF_LOG).ok().as_deref())
    }

    pub fn as_tracing(self) -> Option<Level> {
        match self {
            Self::Off => None,
            Self::Error => Some(Level::ERROR),
            Self::Warn => Some(Level::WARN),
            Self::Info => Some(Level::INFO),
            Self::Debug => Some(Level::DEBUG),
            Self::Trace => Some(Level::TRACE),
        }
    }
}

/// Install the global subscriber for the level in `TF_LOG`
///
/// Returns the level that was applied. Calling it twice is an error from
/// `tracing-subscriber`; the first subscriber stays in place.
pub fn init() -> Result<LogLevel, LoggingError> {
    init_with(LogLevel::from_env())
}

pub fn init_with(level: LogLevel) -> Result<LogLevel, LoggingError> {
    let Some(max_level) = level.as_tracing() else {
        return Ok(level);
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::debug!("Logging initialised at {:?}", level);
    Ok(level)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parses_terraform_levels() {
        assert_eq!(LogLevel::parse(Some("DEBUG")), LogLevel::Debug);
        assert_eq!(LogLevel::parse(Some("warn")), LogLevel::Warn);
        assert_eq!(LogLevel::parse(Some("JSON")), LogLevel::Trace);
        assert_eq!(LogLevel::parse(Some("off")), LogLevel::Off);
        assert_eq!(LogLevel::parse(Some("1")), LogLevel::Info);
    }

    #[test]
    fn unset_or_blank_disables_logging() {
        assert_eq!(LogLevel::parse(None), LogLevel::Off);
        assert_eq!(LogLevel::parse(Some("  ")), LogLevel::Off);
        assert_eq!(LogLevel::Off.as_tracing(), None);
    }

    #[test]
    #[serial]
    fn reads_level_from_environment() {
        std::env::set_var(ENV_TF_LOG, "trace");
        assert_eq!(LogLevel::from_env(), LogLevel::Trace);

        std::env::remove_var(ENV_TF_LOG);
        assert_eq!(LogLevel::from_env(), LogLevel::Off);
    }

    #[test]
    fn off_installs_nothing() {
        assert_eq!(init_with(LogLevel::Off).unwrap(), LogLevel::Off);
    }
}
