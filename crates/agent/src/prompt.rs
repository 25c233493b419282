//! Prompt assembly.
//!
//! Every request carries one system message (policy text plus the whole
//! memory timeline), then the recent window of prior turns, then the pending
//! user message.

use memochat_core::Message;

use crate::state::ConversationState;

/// Prior turns sent with each request.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Instructions telling the model when to emit memory directives.
pub const MEMORY_POLICY: &str = "\
You are a helpful assistant with access to long-term memory. \
Use the long-term memories below to improve your responses.

When you encounter new information during the conversation, check all of the \
following before deciding to save it.

Save the information (inside <append_to_memory> tags) only if:
- It is new information you did not know.
- It is likely to be useful or referenced in future conversations.
- It corrects a misunderstanding or clarifies something for future accuracy.
- The user specifically asked you to remember it.

Do NOT save information that is:
- General knowledge you already know.
- Trivial, obvious, or fleeting.
- Redundant with what is already saved in memory.
- Sensitive, unless explicitly requested.

Only save when there is clear, long-term value. If in doubt, do NOT save.

Correct usage:
<append_to_memory>User prefers concise answers and dislikes emojis.</append_to_memory>

Incorrect usage:
<append_to_memory>Hello, how are you?</append_to_memory>
<append_to_memory>The sky is blue.</append_to_memory>

Keep your responses clear, concise, and helpful.";

const MEMORY_HEADER: &str = "=== Long-term memory ===";
const MEMORY_FOOTER: &str = "=== End of long-term memory ===";

/// Builds the message sequence for one completion request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    window: usize,
    policy: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            window: DEFAULT_HISTORY_WINDOW,
            policy: MEMORY_POLICY.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Replace the policy text. The memory section is still appended.
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Policy text followed by the memory timeline, joined with `\n` and never truncated.
    pub fn system_message(&self, state: &ConversationState) -> Message {
        let memory = state.memory().render();
        Message::system(format!(
            "{}\n\n{MEMORY_HEADER}\n{memory}\n{MEMORY_FOOTER}",
            self.policy
        ))
    }

    /// System message, the last `window` prior turns, then the pending user text.
    ///
    /// `state` must not yet contain the pending turn.
    pub fn build(&self, state: &ConversationState, pending_user_text: &str) -> Vec<Message> {
        let window = state.recent_window(self.window);

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(self.system_message(state));
        messages.extend(window.iter().map(|turn| turn.to_message()));
        messages.push(Message::user(pending_user_text));
        messages
    }
}
