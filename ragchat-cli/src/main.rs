//! RagChat CLI - chat with the RAG backend from the terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use ragchat_cli::{render::render_message, ChatInterface, HttpTransport};
use ragchat_core::{
    init_logging, ChatMode, ClientConfig, Conversation, Locale, LoggingConfig, Model,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(about = "Chat with a RAG backend, directly or through the relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin for direct requests
    #[arg(long, env = "NEXT_PUBLIC_API_URL")]
    api_url: Option<String>,

    /// Send requests through the relay at this origin instead
    #[arg(long, env = "RAGCHAT_RELAY_URL")]
    relay: Option<String>,

    /// Chat mode (rag or general)
    #[arg(short, long)]
    mode: Option<ChatMode>,

    /// Model passed to the backend (openai or midm)
    #[arg(long)]
    model: Option<Model>,

    /// UI language (ko or en)
    #[arg(long)]
    locale: Option<Locale>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// Question to ask
        question: String,

        /// Print the sources under the answer
        #[arg(long)]
        sources: bool,
    },

    /// Manage configuration
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let logging_config = if cli.verbose {
        LoggingConfig::default().with_level("debug")
    } else {
        LoggingConfig::quiet()
    };
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&cli, &config_path)?;
    config.validate().context("Invalid configuration")?;

    info!("Starting RagChat CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let transport = HttpTransport::from_config(&config)?;
            info!("Chatting with {}", transport.origin());

            let mut interface = ChatInterface::new(Conversation::from_config(&config), transport);
            let stdin = std::io::stdin();
            interface.run(stdin.lock(), std::io::stdout()).await?;
        }
        Commands::Ask { question, sources } => {
            let transport = HttpTransport::from_config(&config)?;
            let mut conversation = Conversation::from_config(&config);

            conversation.set_input(question);
            conversation.submit(&transport).await;

            if let Some(index) = conversation.messages().len().checked_sub(1) {
                if sources {
                    conversation.toggle_sources(index);
                }
                print!(
                    "{}",
                    render_message(
                        index,
                        &conversation.messages()[index],
                        conversation.sources_expanded(index),
                        config.locale.strings(),
                    )
                );
            }
        }
        Commands::Config { show, init } => {
            if init {
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                config.save_to_file(&config_path)?;
                println!("Configuration written to {}", config_path.display());
            }
            if show || !init {
                print!("{}", config.to_toml_string()?);
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags
fn load_config(cli: &Cli, path: &Path) -> anyhow::Result<ClientConfig> {
    let mut config = if path.exists() {
        info!("Loading configuration from {:?}", path);
        ClientConfig::from_file(path)?
    } else if cli.config.is_some() {
        anyhow::bail!("Configuration file {} does not exist", path.display());
    } else {
        ClientConfig::default()
    };

    let env = ClientConfig::from_env();
    if env.locale != ClientConfig::default().locale {
        config.locale = env.locale;
    }

    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(relay) = &cli.relay {
        config.relay_url = Some(relay.clone());
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }

    Ok(config)
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ragchat").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("ragchat.toml"))
}
