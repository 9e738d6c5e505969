//! Request/response types used by the handlers

pub mod common;

pub use common::*;
