//! Named presets registered on the client.

use serde_json::Value;

use super::Reply;
use crate::core::{Error, Result};

impl Reply<'_> {
    /// Apply a builder preset. Returns `false` if no preset has that name.
    pub fn use_preset(&mut self, name: &str, args: &[Value]) -> (&mut Self, bool) {
        let preset = self.client.presets.get(name).cloned();
        let Some(preset) = preset else {
            return (self, false);
        };
        preset(self, args);
        (self, true)
    }

    /// Invoke a sender preset.
    pub fn send_preset(&mut self, name: &str, args: &[Value]) -> Result<()> {
        let preset = self.client.sender_presets.get(name).cloned();
        let Some(preset) = preset else {
            return Err(Error::PresetNotFound {
                name: name.to_string(),
            });
        };
        preset(self, args)
    }
}
