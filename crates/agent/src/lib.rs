//! The per-turn conversation pipeline.
//!
//! Each turn runs straight through:
//!
//! 1. **Build the prompt** from the memory timeline and the recent window
//! 2. **Call the provider** once (the only suspension point)
//! 3. **Parse the reply**: extract memory directives and strip them
//! 4. **Update state**: append both turns and extend the memory timeline
//! 5. **Render** the cleaned reply for display
//!
//! State is an explicit value owned by the caller. A failed provider call
//! leaves it exactly as it was.

pub mod prompt;
pub mod runner;
pub mod state;

pub use prompt::{DEFAULT_HISTORY_WINDOW, MEMORY_POLICY, PromptBuilder};
pub use runner::{TurnOutcome, TurnRunner};
pub use state::{CompletedTurn, ConversationState, Speaker, Turn};
