//! RagChat Core - shared data model, configuration and conversation state
//!
//! Used by the relay server (`ragchat-web`) and the terminal chat client
//! (`ragchat-cli`).

pub mod config;
pub mod conversation;
pub mod error;
pub mod locale;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use conversation::*;
pub use error::*;
pub use locale::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
