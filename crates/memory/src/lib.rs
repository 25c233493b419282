//! Long-term memory for memochat.
//!
//! The assistant asks for facts to be remembered by wrapping them in
//! `<append_to_memory>` directives. This crate finds and strips those
//! directives and keeps the resulting facts in an append-only timeline.

pub mod directive;
pub mod timeline;

pub use directive::{
    CLOSE_TAG, OPEN_TAG, ParsedReply, extract_directives, parse_reply, strip_directives,
};
pub use timeline::MemoryTimeline;
