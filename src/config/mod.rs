//! Configuration loaded from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_reply::config::Config;
//! use tokio_reply::ClientBuilder;
//!
//! let config = Config::from_env()?;
//! tokio_reply::logging::init(&config.logging);
//! let client = ClientBuilder::from_config(&config.reply).build();
//! ```

mod error;
mod logging;
mod parse;
mod reply;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use parse::{env_bool, env_opt, env_or, env_parse, parse_pairs};
pub use reply::{is_production_env, parse_code_aliases, ReplyConfig};

/// Complete configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Reply client configuration.
    pub reply: ReplyConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            reply: ReplyConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::{info, warn};

        info!("Configuration loaded:");
        info!("  Pagination: {}", self.reply.pagination_type.as_str());
        info!("  Code aliases: {}", self.reply.code_aliases.len());
        info!("  Default headers: {}", self.reply.default_headers.len());
        info!("  Log filter: {}", self.logging.filter);

        if self.reply.debug_mode {
            if self.reply.production {
                warn!("  Debug mode: enabled (production)");
            } else {
                info!("  Debug mode: enabled");
            }
        }
    }
}
