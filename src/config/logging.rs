//! Logging configuration.

use std::str::FromStr;

use super::parse::{env_opt, env_or};
use super::ConfigError;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines for local development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("expected 'json' or 'pretty', got '{}'", other)),
        }
    }
}

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
    /// Output format (LOG_FORMAT).
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tokio_reply=info".to_string(),
            service_name: "tokio_reply".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: tokio_reply=debug,hyper=warn
    pub fn from_env() -> Result<Self, ConfigError> {
        let format = match env_opt("LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: "LOG_FORMAT".into(),
                message,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            filter: resolve_log_filter(env_opt("LOG_LEVEL"), env_opt("RUST_LOG")),
            service_name: env_or("SERVICE_NAME", "tokio_reply"),
            format,
        })
    }
}

/// Pick the log filter.
///
/// Priority: LOG_LEVEL > RUST_LOG > default (info)
fn resolve_log_filter(log_level: Option<String>, rust_log: Option<String>) -> String {
    if let Some(level) = log_level {
        let level = level.to_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                return format!("tokio_reply={}", level);
            }
            _ => {
                // Logging is not up yet
                eprintln!(
                    "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                    level
                );
            }
        }
    }

    rust_log.unwrap_or_else(|| "tokio_reply=info".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_priority() {
        assert_eq!(resolve_log_filter(None, None), "tokio_reply=info");

        assert_eq!(
            resolve_log_filter(None, Some("tokio_reply=warn,hyper=debug".into())),
            "tokio_reply=warn,hyper=debug"
        );

        // LOG_LEVEL takes priority over RUST_LOG
        assert_eq!(
            resolve_log_filter(Some("DEBUG".into()), Some("hyper=debug".into())),
            "tokio_reply=debug"
        );

        // Invalid LOG_LEVEL falls through
        assert_eq!(
            resolve_log_filter(Some("loud".into()), Some("hyper=debug".into())),
            "hyper=debug"
        );
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
