//! Interactive chat loop
//!
//! Reads lines from any `BufRead`, writes the rendered conversation to any
//! `Write`. Lines starting with `/` are commands; an empty line submits the
//! pending input (filled by `/example`); anything else is sent as a message.

use crate::render::{
    render_conversation, render_header, render_loading, render_message, render_welcome,
};
use ragchat_core::{ChatMode, ChatResult, ChatTransport, Conversation, Model, EXAMPLE_QUESTIONS};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  /mode <rag|general>    switch chat mode
  /model <openai|midm>   switch model
  /sources <n>           show or hide the sources of message n
  /examples              list example questions
  /example <n>           put example question n in the input (Enter sends it)
  /history               print the whole conversation
  /help                  show this help
  /quit                  leave
";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(ChatMode),
    Model(Model),
    /// 1-based message number
    Sources(usize),
    Examples,
    /// 1-based example number
    Example(usize),
    History,
    Help,
    Quit,
    /// Submit whatever is pending in the input
    SubmitPending,
    Send(String),
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::SubmitPending;
        }
        if !trimmed.starts_with('/') {
            return Command::Send(line.to_string());
        }

        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match name {
            "/mode" => arg.parse().map(Command::Mode).unwrap_or_else(Command::Invalid),
            "/model" => arg.parse().map(Command::Model).unwrap_or_else(Command::Invalid),
            "/sources" => parse_number(arg).map(Command::Sources).unwrap_or_else(|| {
                Command::Invalid(format!("expected a message number, got '{}'", arg))
            }),
            "/examples" => Command::Examples,
            "/example" => parse_number(arg).map(Command::Example).unwrap_or_else(|| {
                Command::Invalid(format!("expected an example number, got '{}'", arg))
            }),
            "/history" => Command::History,
            "/help" => Command::Help,
            "/quit" | "/exit" | "/q" => Command::Quit,
            other => Command::Invalid(format!("unknown command '{}' (try /help)", other)),
        }
    }
}

fn parse_number(arg: &str) -> Option<usize> {
    arg.parse().ok().filter(|n| *n > 0)
}

/// Terminal front end over a conversation and a transport
pub struct ChatInterface<T: ChatTransport> {
    conversation: Conversation,
    transport: T,
}

impl<T: ChatTransport> ChatInterface<T> {
    pub fn new(conversation: Conversation, transport: T) -> Self {
        Self {
            conversation,
            transport,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run until `/quit` or end of input
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> ChatResult<()> {
        let strings = self.conversation.locale().strings();

        writeln!(output, "{}", render_header(&self.conversation))?;
        write!(output, "{}", render_welcome(strings))?;
        writeln!(output, "💡 /help")?;

        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Command::Quit => break,
                command => self.handle(command, &mut output).await?,
            }
            output.flush()?;
        }

        info!("{}", self.conversation.stats().summary());
        writeln!(output, "👋")?;
        Ok(())
    }

    async fn handle<W: Write>(&mut self, command: Command, output: &mut W) -> ChatResult<()> {
        match command {
            Command::Send(text) => {
                self.conversation.set_input(text);
                self.send(output).await?;
            }
            Command::SubmitPending => self.send(output).await?,
            Command::Mode(mode) => {
                self.conversation.set_mode(mode);
                writeln!(output, "{}", render_header(&self.conversation))?;
            }
            Command::Model(model) => {
                self.conversation.set_model(model);
                writeln!(output, "{}", render_header(&self.conversation))?;
            }
            Command::Sources(number) => {
                let index = number - 1;
                match self.conversation.toggle_sources(index) {
                    Some(expanded) => {
                        let message = &self.conversation.messages()[index];
                        let strings = self.conversation.locale().strings();
                        write!(output, "{}", render_message(index, message, expanded, strings))?;
                    }
                    None => writeln!(output, "⚠️  message {} has no sources", number)?,
                }
            }
            Command::Examples => {
                for (i, (label, question)) in EXAMPLE_QUESTIONS.iter().enumerate() {
                    writeln!(output, "  {}. {}: {}", i + 1, label, question)?;
                }
            }
            Command::Example(number) => match self.conversation.choose_example(number - 1) {
                Some(question) => writeln!(output, "✏️  {}", question)?,
                None => writeln!(output, "⚠️  no example {}", number)?,
            },
            Command::History => {
                write!(output, "{}", render_conversation(&self.conversation))?;
                writeln!(output, "{}", self.conversation.stats().summary())?;
            }
            Command::Help => write!(output, "{}", HELP)?,
            Command::Invalid(reason) => writeln!(output, "⚠️  {}", reason)?,
            Command::Quit => {}
        }
        Ok(())
    }

    /// Run one exchange, showing the loading indicator while it is in flight
    async fn send<W: Write>(&mut self, output: &mut W) -> ChatResult<()> {
        let Some(pending) = self.conversation.begin_send() else {
            debug!("Nothing to send");
            return Ok(());
        };

        let strings = self.conversation.locale().strings();
        let user_index = self.conversation.messages().len() - 1;
        write!(
            output,
            "{}",
            render_message(
                user_index,
                &self.conversation.messages()[user_index],
                false,
                strings
            )
        )?;
        write!(output, "{}", render_loading(strings))?;
        output.flush()?;

        let result = self.transport.send(pending.mode, &pending.request).await;
        self.conversation.finish(result);

        let index = self.conversation.messages().len() - 1;
        let message = &self.conversation.messages()[index];
        write!(
            output,
            "{}",
            render_message(index, message, self.conversation.sources_expanded(index), strings)
        )?;
        Ok(())
    }
}
