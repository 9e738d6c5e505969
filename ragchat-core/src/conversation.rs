//! Conversation state machine
//!
//! Holds the append-only message list of one chat, the pending input and the
//! per-message visibility of source citations. Exchanges are serialized: while
//! one is in flight the conversation refuses to start another.
//!
//! An exchange runs `Idle -> Sending -> (Success | Error) -> Idle`:
//!
//! ```text
//! begin_send()  appends the user message, returns the request to dispatch
//! finish(result) appends the bot answer or a localized error message
//! ```
//!
//! [`Conversation::submit`] drives both halves over a [`ChatTransport`].

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::locale::Locale;
use crate::traits::ChatTransport;
use crate::types::{ChatAnswer, ChatMode, ChatRequest, Message, Model};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Starter questions offered while the conversation is empty, as (label, question)
pub const EXAMPLE_QUESTIONS: [(&str, &str); 4] = [
    ("LangChain", "LangChain이 뭐야?"),
    ("RAG 설명", "RAG가 뭐고 어떻게 작동해?"),
    ("PGVector 이유", "PGVector를 사용하는 이유는?"),
    ("일상 대화", "안녕! 오늘 기분 어때?"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

/// How a finished exchange ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

/// A request ready to be dispatched, produced by [`Conversation::begin_send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub mode: ChatMode,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationStats {
    pub total_messages: usize,
    pub user_messages: usize,
    pub bot_messages: usize,
}

impl ConversationStats {
    pub fn summary(&self) -> String {
        format!(
            "Chat: {} messages ({} user, {} bot)",
            self.total_messages, self.user_messages, self.bot_messages
        )
    }
}

#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    input: String,
    phase: Phase,
    mode: ChatMode,
    model: Model,
    locale: Locale,
    /// Indices of messages whose sources are expanded
    expanded_sources: HashSet<usize>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(ChatMode::default(), Model::default(), Locale::default())
    }
}

impl Conversation {
    pub fn new(mode: ChatMode, model: Model, locale: Locale) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            phase: Phase::Idle,
            mode,
            model,
            locale,
            expanded_sources: HashSet::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.mode, config.model, config.locale)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the pending input. Ignored while an exchange is in flight.
    pub fn set_input(&mut self, input: impl Into<String>) {
        if self.phase == Phase::Idle {
            self.input = input.into();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase == Phase::Sending
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ChatMode) {
        self.mode = mode;
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether a submit would start an exchange right now
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && !self.input.trim().is_empty()
    }

    /// Start an exchange from the pending input.
    ///
    /// Returns `None`, leaving the conversation untouched, when the input is
    /// blank or another exchange is in flight. Otherwise appends the user
    /// message, clears the input and enters [`Phase::Sending`].
    pub fn begin_send(&mut self) -> Option<PendingExchange> {
        if !self.can_submit() {
            debug!(sending = self.is_sending(), "Submit ignored");
            return None;
        }

        let content = std::mem::take(&mut self.input);
        self.messages.push(Message::user(content.clone()));
        self.phase = Phase::Sending;

        Some(PendingExchange {
            mode: self.mode,
            request: ChatRequest {
                message: content,
                model: self.model,
            },
        })
    }

    /// Complete the in-flight exchange with the endpoint's result.
    ///
    /// Appends exactly one bot message and returns to [`Phase::Idle`]. Prior
    /// history is never touched. Returns `None`, appending nothing, when no
    /// exchange is in flight.
    pub fn finish(&mut self, result: ChatResult<ChatAnswer>) -> Option<Outcome> {
        if self.phase != Phase::Sending {
            debug!("Finish ignored, no exchange in flight");
            return None;
        }
        self.phase = Phase::Idle;

        let outcome = match result {
            Ok(answer) => {
                self.messages.push(Message::bot(answer));
                Outcome::Success
            }
            Err(e) => {
                warn!(error = %e, "Chat exchange failed");
                let failure = self.failure_text(&e);
                self.messages
                    .push(Message::bot_error(self.locale.error_message(&failure)));
                Outcome::Error
            }
        };
        Some(outcome)
    }

    /// Run a full exchange over `transport`.
    ///
    /// Returns `None` without touching the network when the submit is
    /// refused.
    pub async fn submit(&mut self, transport: &dyn ChatTransport) -> Option<Outcome> {
        let pending = self.begin_send()?;

        info!(mode = %pending.mode, model = %pending.request.model, "Sending chat message");
        let result = transport.send(pending.mode, &pending.request).await;

        self.finish(result)
    }

    /// Flip the sources visibility of message `index`.
    ///
    /// Returns the new visibility, or `None` if that message has no sources.
    pub fn toggle_sources(&mut self, index: usize) -> Option<bool> {
        if !self.messages.get(index)?.has_sources() {
            return None;
        }

        if self.expanded_sources.remove(&index) {
            Some(false)
        } else {
            self.expanded_sources.insert(index);
            Some(true)
        }
    }

    /// Sources start collapsed
    pub fn sources_expanded(&self, index: usize) -> bool {
        self.expanded_sources.contains(&index)
    }

    /// Fill the input with one of [`EXAMPLE_QUESTIONS`]; nothing is sent
    pub fn choose_example(&mut self, index: usize) -> Option<&'static str> {
        if self.phase != Phase::Idle {
            return None;
        }
        let (_, question) = *EXAMPLE_QUESTIONS.get(index)?;
        self.input = question.to_string();
        Some(question)
    }

    pub fn stats(&self) -> ConversationStats {
        let user_messages = self.messages.iter().filter(|m| m.is_user).count();
        ConversationStats {
            total_messages: self.messages.len(),
            user_messages,
            bot_messages: self.messages.len() - user_messages,
        }
    }

    fn failure_text(&self, error: &ChatError) -> String {
        match error {
            ChatError::Backend { .. } => self.locale.strings().server_error.to_string(),
            ChatError::Network { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport double answering from a fixed result and counting calls
    struct ScriptedTransport {
        calls: AtomicUsize,
        fail_with_status: Option<u16>,
    }

    impl ScriptedTransport {
        fn answering() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with_status: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with_status: Some(status),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, mode: ChatMode, request: &ChatRequest) -> ChatResult<ChatAnswer> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with_status {
                return Err(ChatError::Backend {
                    status,
                    detail: "boom".to_string(),
                });
            }
            Ok(ChatAnswer {
                answer: format!("{}:{}", mode, request.message),
                sources: Some(vec!["docs/rag.md".to_string()]),
                timestamp: "2025-01-01T00:00:00Z".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let transport = ScriptedTransport::answering();
        let mut conversation = Conversation::default();

        for input in ["", "   ", "\n\t "] {
            conversation.set_input(input);
            assert_eq!(conversation.submit(&transport).await, None);
        }

        assert!(conversation.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let transport = ScriptedTransport::answering();
        let mut conversation = Conversation::default();
        conversation.set_input("  what is RAG?  ");

        let outcome = conversation.submit(&transport).await;
        assert_eq!(outcome, Some(Outcome::Success));
        assert_eq!(transport.calls(), 1);
        assert_eq!(conversation.phase(), Phase::Idle);
        assert_eq!(conversation.input(), "");

        let messages = conversation.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].content, "  what is RAG?  ");
        assert!(!messages[1].is_user);
        assert_eq!(messages[1].content, "rag:  what is RAG?  ");
        assert_eq!(messages[1].timestamp, "2025-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_failed_exchange_keeps_history() {
        let mut conversation = Conversation::default();
        conversation.set_input("first");
        conversation
            .submit(&ScriptedTransport::answering())
            .await
            .unwrap();

        conversation.set_input("second");
        let outcome = conversation.submit(&ScriptedTransport::failing(500)).await;

        assert_eq!(outcome, Some(Outcome::Error));
        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[2].content, "second");
        assert_eq!(
            messages[3].content,
            "죄송합니다. 오류가 발생했습니다: 서버 오류가 발생했습니다."
        );
        assert!(messages[3].sources.is_none());
    }

    #[test]
    fn test_second_submit_refused_while_sending() {
        let mut conversation = Conversation::new(ChatMode::General, Model::Midm, Locale::English);
        conversation.set_input("one");

        let pending = conversation.begin_send().unwrap();
        assert_eq!(pending.mode, ChatMode::General);
        assert_eq!(pending.request.model, Model::Midm);
        assert!(conversation.is_sending());

        conversation.set_input("two");
        assert_eq!(conversation.input(), "");
        assert!(conversation.begin_send().is_none());
        assert_eq!(conversation.messages().len(), 1);

        conversation.finish(Err(ChatError::network("connection refused", None)));
        assert!(!conversation.is_sending());
        assert_eq!(
            conversation.messages()[1].content,
            "Sorry, something went wrong: connection refused"
        );
    }

    #[test]
    fn test_finish_without_exchange_in_flight_is_ignored() {
        let mut conversation = Conversation::default();
        conversation.set_input("hello");

        let stray = Ok(ChatAnswer {
            answer: "unasked".to_string(),
            sources: None,
            timestamp: "t".to_string(),
        });
        assert_eq!(conversation.finish(stray), None);
        assert!(conversation.is_empty());
        assert_eq!(conversation.input(), "hello");

        conversation.begin_send().unwrap();
        let outcome = conversation.finish(Err(ChatError::Timeout { seconds: 1 }));
        assert_eq!(outcome, Some(Outcome::Error));

        // a second result for the same exchange is dropped
        let late = Err(ChatError::Timeout { seconds: 1 });
        assert_eq!(conversation.finish(late), None);
        assert_eq!(conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_toggle_sources_is_involution_and_independent() {
        let transport = ScriptedTransport::answering();
        let mut conversation = Conversation::default();
        for question in ["a", "b"] {
            conversation.set_input(question);
            conversation.submit(&transport).await.unwrap();
        }

        assert!(!conversation.sources_expanded(1));
        assert!(!conversation.sources_expanded(3));

        assert_eq!(conversation.toggle_sources(1), Some(true));
        assert!(conversation.sources_expanded(1));
        assert!(!conversation.sources_expanded(3));

        assert_eq!(conversation.toggle_sources(1), Some(false));
        assert!(!conversation.sources_expanded(1));
        assert!(!conversation.sources_expanded(3));

        // user messages and missing indices have nothing to toggle
        assert_eq!(conversation.toggle_sources(0), None);
        assert_eq!(conversation.toggle_sources(42), None);
    }

    #[test]
    fn test_choose_example_fills_input_only() {
        let mut conversation = Conversation::default();
        assert_eq!(conversation.choose_example(1), Some("RAG가 뭐고 어떻게 작동해?"));
        assert_eq!(conversation.input(), "RAG가 뭐고 어떻게 작동해?");
        assert!(conversation.is_empty());
        assert_eq!(conversation.choose_example(9), None);
    }

    #[tokio::test]
    async fn test_stats() {
        let mut conversation = Conversation::default();
        conversation.set_input("hi");
        conversation
            .submit(&ScriptedTransport::answering())
            .await
            .unwrap();

        let stats = conversation.stats();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.user_messages, 1);
        assert_eq!(stats.bot_messages, 1);
        assert_eq!(stats.summary(), "Chat: 2 messages (1 user, 1 bot)");
    }
}
