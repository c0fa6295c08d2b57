//! Header and cookie pass-through to the adapter's `HeaderMap`.

use http::header::{self, HeaderName, HeaderValue};

use super::Reply;
use crate::cookie::Cookie;

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
        (Ok(name), Ok(value)) => Some((name, value)),
        _ => {
            tracing::warn!(header = name, "skipping invalid response header");
            None
        }
    }
}

impl Reply<'_> {
    /// Set a header, replacing existing values.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> &mut Self {
        if let Some((name, value)) = parse_header(name.as_ref(), value.as_ref()) {
            self.adapter.headers_mut().insert(name, value);
        }
        self
    }

    /// Set several headers, replacing existing values.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self.set_header(name, value);
        }
        self
    }

    /// Append a header value, keeping existing values.
    pub fn add_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> &mut Self {
        if let Some((name, value)) = parse_header(name.as_ref(), value.as_ref()) {
            self.adapter.headers_mut().append(name, value);
        }
        self
    }

    /// Append several header values.
    pub fn add_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self.add_header(name, value);
        }
        self
    }

    /// Remove every value of a header.
    pub fn delete_header(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.adapter.headers_mut().remove(name.as_ref());
        self
    }

    pub fn delete_headers<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for name in names {
            self.delete_header(name);
        }
        self
    }

    /// First value of a header, if set and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.adapter
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// First values of several headers, in the order asked.
    pub fn headers<'n, I>(&self, names: I) -> Vec<Option<&str>>
    where
        I: IntoIterator<Item = &'n str>,
    {
        names.into_iter().map(|name| self.header(name)).collect()
    }

    /// Append one `Set-Cookie` header per cookie.
    pub fn set_cookies<I>(&mut self, cookies: I) -> &mut Self
    where
        I: IntoIterator<Item = Cookie>,
    {
        for cookie in cookies {
            let serialized = cookie.to_string();
            if serialized.is_empty() {
                tracing::warn!(cookie = cookie.name(), "skipping cookie with invalid name");
                continue;
            }
            self.add_header(header::SET_COOKIE, serialized);
        }
        self
    }
}
