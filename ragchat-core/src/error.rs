//! Unified error handling
//!
//! Every failure a chat exchange can run into, both at the relay boundary and
//! inside the client. Each variant knows the HTTP status and structured body
//! the relay answers with.

use crate::types::RelayErrorBody;
use thiserror::Error;
use tracing::{error, warn};

pub type ChatResult<T> = Result<T, ChatError>;

/// Fallback detail used when a backend error body cannot be read
pub const UNREADABLE_ERROR_BODY: &str = "Failed to read error response";

/// Main error type for RagChat
#[derive(Error, Debug)]
pub enum ChatError {
    /// Backend origin is unset or still the placeholder
    #[error("Configuration error: {message}")]
    Configuration { message: String, detail: String },

    /// Backend answered with a non-success status
    #[error("Backend error: {status}")]
    Backend { status: u16, detail: String },

    /// Backend did not answer within the bounded wait
    #[error("Request timeout - backend server did not respond in {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Transport level failure (connect, DNS, malformed body, ...)
    #[error("Network error: {message}")]
    Network {
        message: String,
        backend_url: Option<String>,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Inbound body refused before parsing (too large, unreadable)
    #[error("Request body rejected: {message}")]
    RequestRejected { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Origin is missing or still the placeholder value
    pub fn backend_not_configured() -> Self {
        ChatError::Configuration {
            message: "Backend URL not configured".to_string(),
            detail: "API_URL environment variable is not set".to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        ChatError::Configuration {
            detail: message.clone(),
            message,
        }
    }

    pub fn network(message: impl Into<String>, backend_url: Option<String>) -> Self {
        ChatError::Network {
            message: message.into(),
            backend_url,
        }
    }

    /// HTTP status the relay responds with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ChatError::Backend { status, .. } | ChatError::RequestRejected { status, .. } => {
                *status
            }
            ChatError::Timeout { .. } => 504,
            ChatError::InvalidRequest { .. } => 400,
            ChatError::Configuration { .. }
            | ChatError::Network { .. }
            | ChatError::Io(_) => 500,
        }
    }

    /// Structured payload the relay responds with for this error
    pub fn to_error_body(&self) -> RelayErrorBody {
        match self {
            ChatError::Configuration { message, detail } => RelayErrorBody {
                error: message.clone(),
                detail: Some(detail.clone()),
                backend_url: None,
            },
            ChatError::Backend { status, detail } => RelayErrorBody {
                error: format!("Backend error: {}", status),
                detail: Some(detail.clone()),
                backend_url: None,
            },
            ChatError::Timeout { .. } => RelayErrorBody {
                error: self.to_string(),
                detail: None,
                backend_url: None,
            },
            ChatError::Network {
                message,
                backend_url,
            } => RelayErrorBody {
                error: "Failed to connect to backend server".to_string(),
                detail: Some(if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message.clone()
                }),
                backend_url: backend_url.clone(),
            },
            ChatError::InvalidRequest { message } => RelayErrorBody {
                error: "Invalid request body".to_string(),
                detail: Some(message.clone()),
                backend_url: None,
            },
            ChatError::RequestRejected { message, .. } => RelayErrorBody {
                error: "Invalid request body".to_string(),
                detail: Some(message.clone()),
                backend_url: None,
            },
            ChatError::Io(e) => RelayErrorBody {
                error: "Internal server error".to_string(),
                detail: Some(e.to_string()),
                backend_url: None,
            },
        }
    }

    /// Whether asking again later could succeed. Nothing retries automatically.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ChatError::Network { .. } | ChatError::Timeout { .. } => true,
            ChatError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ChatError::Configuration { .. } => {
                error!(error = %self, "Configuration error");
            }
            ChatError::Backend { status, detail } => {
                warn!(
                    status = *status,
                    detail = %detail,
                    recoverable = self.is_recoverable(),
                    "Backend returned an error"
                );
            }
            ChatError::Timeout { seconds } => {
                warn!(seconds = *seconds, "Backend request timed out");
            }
            ChatError::Network {
                message,
                backend_url,
            } => {
                warn!(
                    error = %message,
                    backend_url = ?backend_url,
                    "Network error (may be recoverable)"
                );
            }
            ChatError::InvalidRequest { .. } | ChatError::RequestRejected { .. } => {
                warn!(error = %self, "Rejected request body");
            }
            _ => {
                error!(error = %self, "Error occurred");
            }
        }
    }
}
