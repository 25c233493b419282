//! Chat completion providers for memochat.
//!
//! All providers implement the `memochat_core::Provider` trait. The
//! connector builds one per session from the connection parameters the
//! user supplied.

pub mod connector;
pub mod openai_compat;

#[cfg(test)]
mod test_server;

pub use connector::OpenAiConnector;
pub use openai_compat::OpenAiCompatProvider;
