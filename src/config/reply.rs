//! Reply client configuration.

use http::StatusCode;

use super::parse::{env_bool, env_opt, env_parse, parse_pairs};
use super::ConfigError;
use crate::client::PaginationType;

/// Reply client configuration loaded from environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplyConfig {
    /// Include `meta.debug` in envelopes (REPLY_DEBUG).
    pub debug_mode: bool,
    /// Pagination strategy (REPLY_PAGINATION: page | offset).
    pub pagination_type: PaginationType,
    /// Error code to status mapping (REPLY_CODE_ALIASES: `NOT_FOUND=404,...`).
    pub code_aliases: Vec<(String, StatusCode)>,
    /// Headers set on every reply (REPLY_DEFAULT_HEADERS: `Name: value; ...`).
    pub default_headers: Vec<(String, String)>,
    /// Production environment (APP_ENV / RUST_ENV).
    pub production: bool,
}

impl ReplyConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let code_aliases = match env_opt("REPLY_CODE_ALIASES") {
            Some(raw) => parse_code_aliases(&raw).map_err(|error| ConfigError::Parse {
                key: "REPLY_CODE_ALIASES".into(),
                value: raw.clone(),
                error,
            })?,
            None => Vec::new(),
        };

        let default_headers = match env_opt("REPLY_DEFAULT_HEADERS") {
            Some(raw) => parse_pairs(&raw, ';', ':').map_err(|message| ConfigError::Invalid {
                key: "REPLY_DEFAULT_HEADERS".into(),
                message,
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            debug_mode: env_bool("REPLY_DEBUG", false),
            pagination_type: env_parse("REPLY_PAGINATION", PaginationType::default())?,
            code_aliases,
            default_headers,
            production: is_production_env(),
        })
    }
}

/// Parse `NOT_FOUND=404,BAD_REQUEST=400`.
pub fn parse_code_aliases(raw: &str) -> Result<Vec<(String, StatusCode)>, String> {
    parse_pairs(raw, ',', '=')?
        .into_iter()
        .map(|(code, status)| {
            let status = status
                .parse::<u16>()
                .ok()
                .and_then(|n| StatusCode::from_u16(n).ok())
                .ok_or_else(|| format!("invalid status '{}' for {}", status, code))?;
            Ok((code, status))
        })
        .collect()
}

/// Check APP_ENV, then RUST_ENV, for `production` or `prod`.
pub fn is_production_env() -> bool {
    env_opt("APP_ENV")
        .or_else(|| env_opt("RUST_ENV"))
        .is_some_and(|env| is_production_name(&env))
}

fn is_production_name(env: &str) -> bool {
    matches!(env.trim().to_lowercase().as_str(), "production" | "prod")
}
