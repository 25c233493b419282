//! Connection parameters established at session start.
//!
//! The API key, base URL, and model name are opaque to the conversation
//! pipeline: they are stored with the session and forwarded to the provider
//! unchanged.

use serde::{Deserialize, Serialize};

/// The three immutable connection parameters of a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
}

impl ConnectionParams {
    /// Build connection parameters, trimming surrounding whitespace from each field.
    pub fn new(
        api_key: impl AsRef<str>,
        base_url: impl AsRef<str>,
        model_name: impl AsRef<str>,
    ) -> Self {
        Self {
            api_key: api_key.as_ref().trim().to_string(),
            base_url: base_url.as_ref().trim().to_string(),
            model_name: model_name.as_ref().trim().to_string(),
        }
    }

    /// All three parameters are present.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty() && !self.model_name.is_empty()
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}
