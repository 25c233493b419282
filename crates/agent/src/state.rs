//! Conversation state: the turn history, the memory timeline, and the
//! connection parameters of one session.

use memochat_core::{ConnectionParams, Message, Role};
use memochat_memory::{MemoryTimeline, parse_reply};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prompt::PromptBuilder;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Completion API role: assistant turns stay assistant, everything else is user.
    pub fn role(&self) -> Role {
        match self {
            Speaker::Assistant => Role::Assistant,
            Speaker::User => Role::User,
        }
    }
}

/// One message exchanged by either party. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// This turn as a prompt message.
    pub fn to_message(&self) -> Message {
        match self.speaker.role() {
            Role::Assistant => Message::assistant(&self.text),
            _ => Message::user(&self.text),
        }
    }
}

/// What `complete_turn` stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTurn {
    /// The assistant reply with directives removed, as appended to history.
    pub reply: String,
    /// Memory entries appended to the timeline, in extraction order.
    pub memories_added: Vec<String>,
}

/// The state of one logical session.
///
/// Serializes to `{ turns, memory_timeline, connection }` so a host can keep
/// it in whatever session storage it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(default)]
    turns: Vec<Turn>,
    #[serde(default)]
    memory_timeline: MemoryTimeline,
    #[serde(default)]
    connection: Option<ConnectionParams>,
}

impl ConversationState {
    /// A fresh session with empty history and memory.
    pub fn new(connection: ConnectionParams) -> Self {
        Self {
            connection: Some(connection),
            ..Self::default()
        }
    }

    /// A session with no connection parameters yet.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> Option<&ConnectionParams> {
        self.connection.as_ref()
    }

    /// Connection parameters are present and complete.
    pub fn is_configured(&self) -> bool {
        self.connection.as_ref().is_some_and(ConnectionParams::is_complete)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn memory(&self) -> &MemoryTimeline {
        &self.memory_timeline
    }

    /// The last `min(window, len)` turns. A view; history is untouched.
    pub fn recent_window(&self, window: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// Append a user turn. Empty-input rejection happens at the boundary.
    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Store a raw assistant reply.
    ///
    /// Directives are extracted and stripped; non-empty payloads extend the
    /// memory timeline in order, and the stripped text becomes the turn.
    pub fn complete_turn(&mut self, assistant_raw: &str) -> CompletedTurn {
        let parsed = parse_reply(assistant_raw);
        let memories_added: Vec<String> = parsed.memories().map(str::to_string).collect();

        self.memory_timeline
            .extend(memories_added.iter().map(String::as_str));
        self.turns.push(Turn::assistant(parsed.cleaned.clone()));

        debug!(
            directives = parsed.directives.len(),
            memories_added = memories_added.len(),
            "Assistant turn stored"
        );

        CompletedTurn {
            reply: parsed.cleaned,
            memories_added,
        }
    }

    /// Prompt messages for `pending_user_text` with the default policy and window.
    pub fn build_prompt(&self, pending_user_text: &str) -> Vec<Message> {
        PromptBuilder::default().build(self, pending_user_text)
    }

    /// Clear history and memory. Connection parameters survive only if asked.
    pub fn reset(&mut self, preserve_connection: bool) {
        self.turns.clear();
        self.memory_timeline.clear();
        if !preserve_connection {
            self.connection = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> ConversationState {
        ConversationState::new(ConnectionParams::new(
            "sk-test",
            "https://api.example.com/v1",
            "test-model",
        ))
    }

    #[test]
    fn new_state_is_empty() {
        let state = configured();
        assert!(state.turns().is_empty());
        assert!(state.memory().is_empty());
        assert!(state.is_configured());
        assert!(!ConversationState::unconfigured().is_configured());
    }

    #[test]
    fn blank_connection_is_not_configured() {
        let state = ConversationState::new(ConnectionParams::new("", "https://x", "m"));
        assert!(!state.is_configured());
    }

    #[test]
    fn speaker_maps_to_role() {
        assert_eq!(Speaker::Assistant.role(), Role::Assistant);
        assert_eq!(Speaker::User.role(), Role::User);
        assert_eq!(Turn::assistant("a").to_message().role, Role::Assistant);
        assert_eq!(Turn::user("u").to_message().role, Role::User);
    }

    #[test]
    fn recent_window_is_a_suffix_view() {
        let mut state = configured();
        for i in 0..25 {
            state.append_user_turn(format!("turn {i}"));
        }

        let window = state.recent_window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].text(), "turn 15");
        assert_eq!(window[9].text(), "turn 24");
        assert_eq!(state.turns().len(), 25);

        assert_eq!(state.recent_window(100).len(), 25);
        assert!(state.recent_window(0).is_empty());
    }

    #[test]
    fn complete_turn_accumulates_memory_in_order() {
        let mut state = configured();
        state.append_user_turn("My name is Ada and I like tea.");

        let turn = state.complete_turn(
            "Nice to meet you, Ada!\n\
             <append_to_memory>User's name is Ada.</append_to_memory>\n\
             <append_to_memory> User likes tea. </append_to_memory>",
        );

        assert_eq!(turn.reply, "Nice to meet you, Ada!");
        assert_eq!(turn.memories_added, vec!["User's name is Ada.", "User likes tea."]);
        assert_eq!(
            state.memory().iter().collect::<Vec<_>>(),
            vec!["User's name is Ada.", "User likes tea."]
        );
        assert_eq!(state.turns().len(), 2);
        assert_eq!(state.turns()[1].speaker(), Speaker::Assistant);
        assert_eq!(state.turns()[1].text(), "Nice to meet you, Ada!");
    }

    #[test]
    fn empty_directive_adds_nothing() {
        let mut state = configured();
        let turn = state.complete_turn("Okay. <append_to_memory>  \n </append_to_memory>");
        assert!(turn.memories_added.is_empty());
        assert!(state.memory().is_empty());
        assert_eq!(state.turns()[0].text(), "Okay.");
    }

    #[test]
    fn memory_spans_turns() {
        let mut state = configured();
        state.complete_turn("<append_to_memory>first</append_to_memory>");
        state.complete_turn("<append_to_memory>second</append_to_memory>");
        state.complete_turn("<append_to_memory>first</append_to_memory>");
        assert_eq!(state.memory().render(), "first\nsecond\nfirst");
    }

    #[test]
    fn reset_preserving_connection() {
        let mut state = configured();
        for i in 0..5 {
            state.append_user_turn(format!("{i}"));
        }
        state.complete_turn(
            "<append_to_memory>a</append_to_memory><append_to_memory>b</append_to_memory>",
        );
        assert_eq!(state.turns().len(), 6);
        assert_eq!(state.memory().len(), 2);

        let before = state.connection().cloned();
        state.reset(true);

        assert!(state.turns().is_empty());
        assert!(state.memory().is_empty());
        assert_eq!(state.connection().cloned(), before);
        assert!(state.is_configured());
    }

    #[test]
    fn reset_clearing_everything() {
        let mut state = configured();
        state.append_user_turn("hi");
        state.reset(false);
        assert!(state.turns().is_empty());
        assert!(state.connection().is_none());
    }

    #[test]
    fn reset_unconfigured_is_fine() {
        let mut state = ConversationState::unconfigured();
        state.reset(true);
        assert_eq!(state, ConversationState::unconfigured());
    }

    #[test]
    fn session_shape_roundtrip() {
        let mut state = configured();
        state.append_user_turn("hello");
        state.complete_turn("hi <append_to_memory>greets politely</append_to_memory>");

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["turns"][0]["speaker"], "User");
        assert_eq!(json["turns"][1]["text"], "hi");
        assert_eq!(json["memory_timeline"][0], "greets politely");
        assert_eq!(json["connection"]["model_name"], "test-model");

        let back: ConversationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
