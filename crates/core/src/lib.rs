//! # memochat core
//!
//! Domain types, traits, and error definitions shared by every memochat crate.
//! Nothing here talks to the network or the filesystem; implementations live
//! in their respective crates and depend inward on this one.

pub mod connection;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use connection::ConnectionParams;
pub use error::{Error, ProviderError, Result};
pub use message::{Message, Role};
pub use provider::{Connector, Provider, ProviderRequest, ProviderResponse, Usage};
