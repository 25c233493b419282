//! The turn runner: one submitted user message, end to end.

use std::sync::Arc;

use memochat_config::ConversationConfig;
use memochat_core::{Connector, Error, ProviderRequest, Result};
use memochat_render::render_assistant;
use tracing::{debug, info, warn};

use crate::prompt::PromptBuilder;
use crate::state::ConversationState;

/// What a submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input was empty after trimming. Nothing was sent or stored.
    Skipped,
    /// Both turns were stored.
    Completed {
        /// Cleaned assistant reply as stored in history.
        reply: String,
        /// Entries appended to the memory timeline by this turn.
        memories_added: Vec<String>,
        /// Display HTML for the cleaned reply.
        rendered: String,
    },
}

/// Runs turns against whichever provider a session is connected to.
pub struct TurnRunner {
    connector: Arc<dyn Connector>,
    prompt: PromptBuilder,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl TurnRunner {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            prompt: PromptBuilder::default(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// A runner using the `[conversation]` settings.
    pub fn from_config(connector: Arc<dyn Connector>, config: &ConversationConfig) -> Self {
        let mut prompt = PromptBuilder::new().with_window(config.history_window);
        if let Some(policy) = &config.system_prompt_override {
            prompt = prompt.with_policy(policy.clone());
        }
        Self {
            connector,
            prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn prompt(&self) -> &PromptBuilder {
        &self.prompt
    }

    /// Submit one user message.
    ///
    /// State is only touched after the provider answers: on any error the
    /// history and memory timeline are exactly as they were.
    pub async fn submit_turn(
        &self,
        state: &mut ConversationState,
        user_text: &str,
    ) -> Result<TurnOutcome> {
        let text = user_text.trim();
        if text.is_empty() {
            debug!("Empty input, turn skipped");
            return Ok(TurnOutcome::Skipped);
        }

        let params = match state.connection() {
            Some(params) if params.is_complete() => params,
            _ => return Err(Error::SessionNotConfigured),
        };

        let provider = self.connector.connect(params)?;

        let mut request = ProviderRequest::new(&params.model_name, self.prompt.build(state, text));
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        info!(
            provider = provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            memories = state.memory().len(),
            "Submitting turn"
        );

        let response = match provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Completion request failed, state unchanged");
                return Err(Error::CompletionRequestFailed(e));
            }
        };

        state.append_user_turn(text);
        let completed = state.complete_turn(&response.message.content);
        let rendered = render_assistant(&completed.reply);

        debug!(
            turns = state.turns().len(),
            memories_added = completed.memories_added.len(),
            "Turn completed"
        );

        Ok(TurnOutcome::Completed {
            reply: completed.reply,
            memories_added: completed.memories_added,
            rendered,
        })
    }
}
