//! User-facing strings of the chat client

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

/// String table for one locale
#[derive(Debug, Clone, Copy)]
pub struct Strings {
    pub greeting: &'static str,
    /// Prepended to the failure message of a failed exchange
    pub error_prefix: &'static str,
    /// Failure message used when the endpoint answers with a non-success status
    pub server_error: &'static str,
    pub show_sources: &'static str,
    pub hide_sources: &'static str,
    pub input_placeholder: &'static str,
    pub loading: &'static str,
}

const KOREAN: Strings = Strings {
    greeting: "ㅎㅇ",
    error_prefix: "죄송합니다. 오류가 발생했습니다: ",
    server_error: "서버 오류가 발생했습니다.",
    show_sources: "📚 출처 보기 ▼",
    hide_sources: "📚 출처 숨기기 ▲",
    input_placeholder: "메시지를 입력하세요...",
    loading: "...",
};

const ENGLISH: Strings = Strings {
    greeting: "Hi there",
    error_prefix: "Sorry, something went wrong: ",
    server_error: "The server returned an error.",
    show_sources: "📚 Show sources ▼",
    hide_sources: "📚 Hide sources ▲",
    input_placeholder: "Type a message...",
    loading: "...",
};

impl Locale {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::Korean => &KOREAN,
            Locale::English => &ENGLISH,
        }
    }

    /// Bot-facing text for a failed exchange
    pub fn error_message(&self, failure: &str) -> String {
        format!("{}{}", self.strings().error_prefix, failure)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "korean" => Ok(Locale::Korean),
            "en" | "english" => Ok(Locale::English),
            other => Err(format!("unsupported locale '{}' (expected ko or en)", other)),
        }
    }
}
