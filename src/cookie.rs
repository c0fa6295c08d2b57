//! `Set-Cookie` serialization.
//!
//! ```rust,ignore
//! use tokio_reply::cookie::{Cookie, SameSite};
//!
//! let session = Cookie::new("session", "abc123")
//!     .with_path("/")
//!     .with_max_age(3600)
//!     .with_http_only(true)
//!     .with_same_site(SameSite::Lax);
//!
//! assert_eq!(
//!     session.to_string(),
//!     "session=abc123; Path=/; Max-Age=3600; HttpOnly; SameSite=Lax"
//! );
//! ```

use std::fmt;
use std::net::IpAddr;
use std::time::SystemTime;

use crate::time::http_date;

/// SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Attribute is not emitted.
    #[default]
    Default,
    Lax,
    Strict,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Default => Ok(()),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::Strict => write!(f, "Strict"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Cookie sent with `Reply::set_cookies`.
///
/// The name must be an HTTP token, otherwise the cookie serializes to an
/// empty string and is skipped. Value and path bytes that are not allowed
/// are dropped. An invalid domain is left out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    expires: Option<SystemTime>,
    /// `> 0` sends the value, `< 0` sends `Max-Age=0`, `0` sends nothing.
    max_age: i64,
    secure: bool,
    http_only: bool,
    same_site: SameSite,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Check if the name is a valid HTTP token.
    pub fn is_valid_name(&self) -> bool {
        !self.name.is_empty() && self.name.bytes().all(is_token_byte)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid_name() {
            return Ok(());
        }

        write!(f, "{}={}", self.name, sanitize_value(&self.value))?;

        if let Some(path) = &self.path {
            if !path.is_empty() {
                write!(f, "; Path={}", sanitize_path(path))?;
            }
        }

        if let Some(domain) = &self.domain {
            if is_valid_domain(domain) {
                write!(f, "; Domain={}", domain.trim_start_matches('.'))?;
            } else {
                tracing::warn!(domain = %domain, cookie = %self.name, "skipping invalid cookie domain");
            }
        }

        if let Some(expires) = self.expires {
            write!(f, "; Expires={}", http_date(expires))?;
        }

        if self.max_age > 0 {
            write!(f, "; Max-Age={}", self.max_age)?;
        } else if self.max_age < 0 {
            write!(f, "; Max-Age=0")?;
        }

        if self.http_only {
            write!(f, "; HttpOnly")?;
        }

        if self.secure {
            write!(f, "; Secure")?;
        }

        if self.same_site != SameSite::Default {
            write!(f, "; SameSite={}", self.same_site)?;
        }

        Ok(())
    }
}

/// RFC 7230 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

fn is_value_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b'"' && b != b';' && b != b'\\'
}

fn is_path_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b';'
}

/// Drop invalid bytes; quote values containing a space or comma.
fn sanitize_value(value: &str) -> String {
    let clean: String = value
        .chars()
        .filter(|c| c.is_ascii() && is_value_byte(*c as u8))
        .collect();

    if clean.contains(' ') || clean.contains(',') {
        format!("\"{}\"", clean)
    } else {
        clean
    }
}

fn sanitize_path(path: &str) -> String {
    path.chars()
        .filter(|c| c.is_ascii() && is_path_byte(*c as u8))
        .collect()
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 255 {
        return false;
    }

    // IPv4 is allowed, IPv6 is not
    if let Ok(ip) = domain.parse::<IpAddr>() {
        return ip.is_ipv4();
    }

    let host = domain.strip_prefix('.').unwrap_or(domain);
    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        })
}
