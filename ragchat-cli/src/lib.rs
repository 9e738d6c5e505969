//! RagChat CLI - terminal chat client
//!
//! Sends messages to the RAG backend (directly or through the relay) and
//! renders answers with their source citations.

pub mod interface;
pub mod render;
pub mod transport;

pub use interface::{ChatInterface, Command};
pub use transport::HttpTransport;
