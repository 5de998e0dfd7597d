//! Vedaguru CLI: the main entry point.
//!
//! Commands:
//! - `ask`: One question, one reply
//! - `chat`: Interactive conversation on a topic
//! - `prompt`: Print the assembled system prompt
//! - `topics`: List categories and topics
//! - `doctor`: Diagnose configuration and provider keys

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vedaguru",
    about = "Vedaguru — conversational guide to Hindu scripture",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

/// Category, topic and provider shared by the chat-style commands.
#[derive(clap::Args, Debug, Clone)]
pub struct TopicArgs {
    /// Category id (vedas, puranas, epics, knowledge, characters)
    #[arg(short, long)]
    category: String,

    /// Topic id within the category (see `vedaguru topics`)
    #[arg(short, long)]
    topic: String,

    /// Provider to use instead of the configured default
    #[arg(short, long, env = "VEDAGURU_PROVIDER")]
    provider: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        #[command(flatten)]
        target: TopicArgs,

        /// Print the full reply as JSON
        #[arg(long)]
        json: bool,

        /// The question
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Start an interactive conversation
    Chat {
        #[command(flatten)]
        target: TopicArgs,
    },

    /// Print the system prompt a request would use
    Prompt {
        #[arg(short, long)]
        category: String,

        #[arg(short, long, default_value = "")]
        topic: String,

        /// Use the brief-answer variant
        #[arg(long)]
        short: bool,
    },

    /// List categories and topics
    Topics {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Diagnose configuration and provider keys
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Ask { target, json, message } => commands::ask::run(target, message.join(" "), json).await?,
        Commands::Chat { target } => commands::chat::run(target).await?,
        Commands::Prompt { category, topic, short } => commands::prompt::run(&category, &topic, short)?,
        Commands::Topics { category } => commands::topics::run(category.as_deref())?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
