//! Builds providers from session connection parameters.

use std::sync::Arc;

use memochat_core::{ConnectionParams, Connector, Provider, ProviderError};

use crate::openai_compat::OpenAiCompatProvider;

/// Connects sessions to OpenAI-compatible endpoints.
///
/// Holds one HTTP client so connection pools are shared across sessions.
/// The client sets no request timeout; a completion takes as long as the
/// endpoint needs.
pub struct OpenAiConnector {
    client: reqwest::Client,
}

impl OpenAiConnector {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OpenAiConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for OpenAiConnector {
    fn connect(&self, params: &ConnectionParams) -> Result<Arc<dyn Provider>, ProviderError> {
        if !params.is_complete() {
            return Err(ProviderError::NotConfigured(
                "API key, base URL and model name are all required".into(),
            ));
        }

        if !params.base_url.starts_with("http://") && !params.base_url.starts_with("https://") {
            return Err(ProviderError::NotConfigured(format!(
                "base URL must start with http:// or https://, got '{}'",
                params.base_url
            )));
        }

        Ok(Arc::new(OpenAiCompatProvider::with_client(
            "openai-compatible",
            &params.base_url,
            &params.api_key,
            self.client.clone(),
        )))
    }
}
