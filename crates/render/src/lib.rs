//! Safe display of assistant output.
//!
//! Assistant text is escaped everywhere except inside code spans and fenced
//! blocks, then rendered from Markdown to HTML. User text is only escaped.

pub mod markdown;
pub mod sanitize;

pub use markdown::{render_assistant, render_markdown, render_user};
pub use sanitize::{escape_html, escape_outside_code};
