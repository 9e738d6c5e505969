//! Plain-text rendering of a conversation
//!
//! Messages are numbered from 1 on screen; `/sources <n>` uses the same
//! numbers.

use ragchat_core::{ChatMode, Conversation, Message, Strings, EXAMPLE_QUESTIONS};
use std::fmt::Write;

const BOT_AVATAR: &str = "🤖";
const USER_AVATAR: &str = "👤";

/// One-line summary of the current mode and model
pub fn render_header(conversation: &Conversation) -> String {
    format!(
        "Mode: {}  Model: {}",
        match conversation.mode() {
            ChatMode::Rag => "📚 Knowledge Base (RAG)",
            ChatMode::General => "💬 General",
        },
        conversation.model()
    )
}

/// Render message `index` of the conversation
pub fn render_message(
    index: usize,
    message: &Message,
    sources_expanded: bool,
    strings: &Strings,
) -> String {
    let mut out = String::new();
    let avatar = if message.is_user {
        USER_AVATAR
    } else {
        BOT_AVATAR
    };
    let _ = writeln!(out, "[{}] {} {}", index + 1, avatar, message.content);

    if message.has_sources() {
        let label = if sources_expanded {
            strings.hide_sources
        } else {
            strings.show_sources
        };
        let _ = writeln!(out, "    {}", label);

        if sources_expanded {
            for source in message.sources.iter().flatten() {
                let _ = writeln!(out, "      - {}", source);
            }
        }
    }

    out
}

/// Greeting and starter questions shown while nothing has been said yet
pub fn render_welcome(strings: &Strings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", BOT_AVATAR, strings.greeting);
    for (i, (label, question)) in EXAMPLE_QUESTIONS.iter().enumerate() {
        let _ = writeln!(out, "    /example {}  {}: {}", i + 1, label, question);
    }
    let _ = writeln!(out, "💬 {}", strings.input_placeholder);
    out
}

pub fn render_loading(strings: &Strings) -> String {
    format!("{} {}\n", BOT_AVATAR, strings.loading)
}

/// Render the whole conversation
pub fn render_conversation(conversation: &Conversation) -> String {
    let strings = conversation.locale().strings();

    if conversation.is_empty() {
        return render_welcome(strings);
    }

    let mut out = String::new();
    for (index, message) in conversation.messages().iter().enumerate() {
        out.push_str(&render_message(
            index,
            message,
            conversation.sources_expanded(index),
            strings,
        ));
    }
    if conversation.is_sending() {
        out.push_str(&render_loading(strings));
    }
    out
}
