//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse environment variable as boolean.
/// Treats "1", "true" (case-insensitive) as true.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            error: e.to_string(),
        }),
        _ => Ok(default),
    }
}

/// Split `"a=1,b=2"` style lists into trimmed key/value pairs.
///
/// Empty items are skipped. An item without `kv_sep` or with an empty key
/// is an error.
pub fn parse_pairs(
    s: &str,
    item_sep: char,
    kv_sep: char,
) -> Result<Vec<(String, String)>, String> {
    s.split(item_sep)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (key, value) = item
                .split_once(kv_sep)
                .ok_or_else(|| format!("expected '{}' in '{}'", kv_sep, item))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(format!("empty key in '{}'", item));
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}
