//! Request-scoped context and value store.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::time::Instant;

/// Request-scoped state passed explicitly through a handler.
///
/// Context carries:
/// - A short request ID for log correlation
/// - Timing information
/// - Response headers every reply for this request should start with
/// - A typed key-value store (used by `Client::use_reply` to keep one reply
///   per request)
pub struct RequestContext {
    /// Short request ID for logging.
    pub request_id: String,

    /// Request start time.
    pub started_at: Instant,

    /// Response headers to seed adapters with.
    response_headers: Vec<(String, String)>,

    /// Custom key-value storage.
    values: HashMap<String, Box<dyn Any + Send>>,
}

impl RequestContext {
    /// Create a context with a freshly generated request ID.
    #[inline]
    pub fn new() -> Self {
        Self::with_request_id(generate_request_id())
    }

    /// Create a context with a request ID propagated from upstream.
    #[inline]
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started_at: Instant::now(),
            response_headers: Vec::with_capacity(4),
            values: HashMap::new(),
        }
    }

    /// Set a custom value.
    #[inline]
    pub fn set<T: Send + 'static>(&mut self, key: &str, value: T) {
        self.values.insert(key.to_string(), Box::new(value));
    }

    /// Set an already boxed value.
    #[inline]
    pub fn set_boxed(&mut self, key: &str, value: Box<dyn Any + Send>) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a custom value.
    #[inline]
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref())
    }

    /// Get an untyped reference to a stored value.
    #[inline]
    pub fn get_any(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.values.get(key).map(|v| v.as_ref())
    }

    /// Get a mutable reference to a custom value.
    #[inline]
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut())
    }

    /// Remove a custom value.
    #[inline]
    pub fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        self.values
            .remove(key)
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Remove a stored value without knowing its type.
    #[inline]
    pub fn remove_boxed(&mut self, key: &str) -> Option<Box<dyn Any + Send>> {
        self.values.remove(key)
    }

    /// Add a response header that adapters built on this context start with.
    #[inline]
    pub fn set_response_header(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        self.response_headers
            .retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.response_headers.push((name, value.to_string()));
    }

    /// Get all response headers to seed.
    #[inline]
    pub fn response_headers(&self) -> &[(String, String)] {
        &self.response_headers
    }

    /// Get elapsed time since request started.
    #[inline]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Get elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("response_headers", &self.response_headers)
            .field("values", &self.values.len())
            .finish()
    }
}

// ============================================================================
// Fast random ID generation with thread-local state
// ============================================================================

thread_local! {
    static RNG_STATE: Cell<u64> = Cell::new(init_rng_seed());
}

/// Initialize RNG seed from system entropy.
fn init_rng_seed() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{SystemTime, UNIX_EPOCH};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    hasher.write_u64(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
    );
    // xorshift state must never be zero
    hasher.finish() | 1
}

/// Fast random u64 using thread-local xorshift64.
#[inline]
fn rand_u64() -> u64 {
    RNG_STATE.with(|state| {
        let mut x = state.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        state.set(x);
        x
    })
}

/// Generate a request ID: 12 hex chars of time, a dash, 4 hex chars of noise.
pub fn generate_request_id() -> String {
    use std::fmt::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let mut id = String::with_capacity(17);
    let _ = write!(
        id,
        "{:012x}-{:04x}",
        timestamp & 0xffff_ffff_ffff,
        rand_u64() & 0xffff
    );
    id
}
