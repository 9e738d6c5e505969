//! Core data type definitions

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A single entry of the conversation.
///
/// Messages are never mutated after they are appended to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content: String,
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// ISO-8601 timestamp
    pub timestamp: String,
}

impl Message {
    /// Message authored by the user, stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_user: true,
            sources: None,
            timestamp: now_iso8601(),
        }
    }

    /// Bot message built from a backend answer, passed through verbatim
    pub fn bot(answer: ChatAnswer) -> Self {
        Self {
            content: answer.answer,
            is_user: false,
            sources: answer.sources,
            timestamp: answer.timestamp,
        }
    }

    /// Bot message reporting a failed exchange
    pub fn bot_error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_user: false,
            sources: None,
            timestamp: now_iso8601(),
        }
    }

    /// Whether this message carries citations worth rendering
    pub fn has_sources(&self) -> bool {
        !self.is_user && self.sources.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Which backend endpoint a message is routed to
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Knowledge base search followed by generation
    #[default]
    Rag,
    /// Plain LLM conversation
    General,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Rag => "rag",
            ChatMode::General => "general",
        }
    }

    /// Path of the chat endpoint for this mode, relative to an origin
    pub fn endpoint(&self) -> &'static str {
        match self {
            ChatMode::Rag => "/api/chat/rag",
            ChatMode::General => "/api/chat/general",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rag" => Ok(ChatMode::Rag),
            "general" => Ok(ChatMode::General),
            other => Err(format!("unknown chat mode '{}' (expected rag or general)", other)),
        }
    }
}

/// Model selector forwarded to the backend untouched
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    #[default]
    Openai,
    Midm,
}

impl Model {
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Openai => "openai",
            Model::Midm => "midm",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Model::Openai),
            "midm" => Ok(Model::Midm),
            other => Err(format!("unknown model '{}' (expected openai or midm)", other)),
        }
    }
}

/// Body sent to a chat endpoint
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub model: Model,
}

/// Successful answer returned by a chat endpoint
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    pub timestamp: String,
}

/// Structured error payload returned by the relay for every non-200 outcome
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

/// Current UTC time as an ISO-8601 string with millisecond precision
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Truncate `text` to at most `max_chars` characters (not bytes)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization_uses_camel_case() {
        let message = Message::user("hello");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["isUser"], true);
        assert!(json.get("sources").is_none());
    }

    #[test]
    fn test_bot_message_passes_answer_through() {
        let answer = ChatAnswer {
            answer: "hi".to_string(),
            sources: Some(vec!["a".to_string()]),
            timestamp: "t".to_string(),
        };
        let message = Message::bot(answer);
        assert_eq!(message.content, "hi");
        assert_eq!(message.sources, Some(vec!["a".to_string()]));
        assert_eq!(message.timestamp, "t");
        assert!(message.has_sources());
    }

    #[test]
    fn test_empty_sources_are_not_rendered() {
        let message = Message::bot(ChatAnswer {
            answer: "hi".to_string(),
            sources: Some(vec![]),
            timestamp: "t".to_string(),
        });
        assert!(!message.has_sources());
    }

    #[test]
    fn test_mode_and_model_parsing() {
        assert_eq!("RAG".parse::<ChatMode>().unwrap(), ChatMode::Rag);
        assert_eq!(" general ".parse::<ChatMode>().unwrap(), ChatMode::General);
        assert!("search".parse::<ChatMode>().is_err());
        assert_eq!("midm".parse::<Model>().unwrap(), Model::Midm);
        assert_eq!(ChatMode::General.endpoint(), "/api/chat/general");
    }

    #[test]
    fn test_chat_request_wire_format() {
        let request = ChatRequest {
            message: "RAG가 뭐야?".to_string(),
            model: Model::Midm,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"message": "RAG가 뭐야?", "model": "midm"}));
    }

    #[test]
    fn test_answer_ignores_unknown_fields() {
        let answer: ChatAnswer = serde_json::from_str(
            r#"{"answer":"ok","sources":["doc"],"timestamp":"t","model_info":{"name":"x"}}"#,
        )
        .unwrap();
        assert_eq!(answer.sources.unwrap(), vec!["doc".to_string()]);
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        let text = "가".repeat(250);
        let truncated = truncate_chars(&text, 200);
        assert_eq!(truncated.chars().count(), 200);
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
