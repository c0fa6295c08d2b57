//! Core error types.

use std::fmt;

/// Errors returned by replies and adapters.
#[derive(Debug)]
pub enum Error {
    /// A terminal send was attempted on a reply that was already sent.
    AlreadySent,

    /// No preset is registered under this name.
    PresetNotFound { name: String },

    /// JSON encoding failed.
    Json(serde_json::Error),

    /// XML encoding failed.
    Xml(String),

    /// I/O error.
    Io(std::io::Error),

    /// The response under construction can't take this operation.
    InvalidResponse(String),

    /// Custom error with message.
    Custom(String),
}

impl Error {
    /// Check if this is the double-send error.
    #[inline]
    pub fn is_already_sent(&self) -> bool {
        matches!(self, Error::AlreadySent)
    }

    /// Check if this is a missing preset error, whatever the name.
    #[inline]
    pub fn is_preset_not_found(&self) -> bool {
        matches!(self, Error::PresetNotFound { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadySent => {
                write!(f, "reply: can not send more data, response already sent")
            }
            Error::PresetNotFound { name } => write!(f, "reply: preset not found, name: {}", name),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Xml(msg) => write!(f, "XML error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Custom(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias for reply operations.
pub type Result<T> = std::result::Result<T, Error>;
