//! HTTP request handlers for the relay server

pub mod chat;
pub mod docs;
pub mod health;
pub mod types;

pub use chat::*;
pub use docs::*;
pub use health::*;

pub use types::*;
