//! Configuration management
//!
//! Defaults, TOML files and environment variables for both the relay and the
//! chat client. Command-line flags are layered on top by the binaries.

use crate::error::{ChatError, ChatResult};
use crate::locale::Locale;
use crate::types::{ChatMode, Model};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Fallback origin used when nothing is configured.
///
/// The relay treats this value as "not configured".
pub const PLACEHOLDER_BACKEND_ORIGIN: &str = "http://localhost:8000";

/// Bounded wait for a relayed backend call
pub const RELAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum characters of a backend error body echoed back to the client
pub const ERROR_DETAIL_MAX_CHARS: usize = 200;

/// Default wait for the chat client's own requests
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Relay-side configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Backend origin, e.g. `https://api.example.com`
    pub backend_origin: Option<String>,
    pub timeout_secs: u64,
    pub error_detail_max_chars: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend_origin: None,
            timeout_secs: RELAY_TIMEOUT.as_secs(),
            error_detail_max_chars: ERROR_DETAIL_MAX_CHARS,
        }
    }
}

impl RelayConfig {
    /// Load from `API_URL` / `NEXT_PUBLIC_API_URL` and `RAGCHAT_RELAY_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_origin = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup("NEXT_PUBLIC_API_URL").filter(|v| !v.trim().is_empty()));

        let timeout_secs = lookup("RAGCHAT_RELAY_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(RELAY_TIMEOUT.as_secs());

        Self {
            backend_origin,
            timeout_secs,
            ..Self::default()
        }
    }

    /// The origin the relay would use, with the placeholder fallback applied
    pub fn resolved_origin(&self) -> &str {
        self.backend_origin
            .as_deref()
            .map(|origin| origin.trim_end_matches('/'))
            .unwrap_or(PLACEHOLDER_BACKEND_ORIGIN)
    }

    /// Whether a real backend origin has been supplied
    pub fn is_configured(&self) -> bool {
        let origin = self.resolved_origin();
        !origin.trim().is_empty() && origin != PLACEHOLDER_BACKEND_ORIGIN
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> ChatResult<()> {
        if self.timeout_secs == 0 {
            return Err(ChatError::config("Relay timeout must be greater than 0"));
        }
        if self.error_detail_max_chars == 0 {
            return Err(ChatError::config(
                "Error detail limit must be greater than 0",
            ));
        }
        if let Some(origin) = &self.backend_origin {
            validate_origin(origin)?;
        }
        Ok(())
    }
}

/// Chat client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin used when talking to the backend directly
    pub api_url: String,
    /// Relay origin; when set, requests go through the relay instead
    pub relay_url: Option<String>,
    pub mode: ChatMode,
    pub model: Model,
    pub locale: Locale,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: PLACEHOLDER_BACKEND_ORIGIN.to_string(),
            relay_url: None,
            mode: ChatMode::default(),
            model: Model::default(),
            locale: Locale::default(),
            request_timeout_secs: CLIENT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfig {
    /// Load from `NEXT_PUBLIC_API_URL`, `RAGCHAT_RELAY_URL` and `RAGCHAT_LOCALE`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(api_url) = lookup("NEXT_PUBLIC_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = api_url;
        }
        config.relay_url = lookup("RAGCHAT_RELAY_URL").filter(|v| !v.trim().is_empty());
        if let Some(locale) = lookup("RAGCHAT_LOCALE").and_then(|v| v.parse().ok()) {
            config.locale = locale;
        }
        config
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ChatResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ChatError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| ChatError::config(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml_string(&self) -> ChatResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ChatError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ChatResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Origin the client actually sends requests to
    pub fn target_origin(&self) -> &str {
        self.relay_url
            .as_deref()
            .unwrap_or(&self.api_url)
            .trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> ChatResult<()> {
        validate_origin(&self.api_url)?;
        if let Some(relay_url) = &self.relay_url {
            validate_origin(relay_url)?;
        }
        if self.request_timeout_secs == 0 {
            return Err(ChatError::config("Request timeout must be greater than 0"));
        }
        Ok(())
    }
}

fn validate_origin(origin: &str) -> ChatResult<()> {
    let parsed = url::Url::parse(origin)
        .map_err(|e| ChatError::config(format!("Invalid URL '{}': {}", origin, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ChatError::config(format!(
            "Unsupported URL scheme '{}' in '{}'",
            scheme, origin
        ))),
    }
}
