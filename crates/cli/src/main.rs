//! MailPilot CLI, the main entry point.
//!
//! Commands:
//! - `onboard` : Create the config file
//! - `chat`    : Interactive or single-message chat with the email assistant
//! - `tools`   : List the email tools offered to the model
//! - `doctor`  : Diagnose configuration and connectivity
//! - `config`  : Validate, show or locate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mailpilot",
    about = "MailPilot: manage your inbox by chatting with an LLM",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create ~/.mailpilot/config.toml with defaults
    Onboard,

    /// Chat with the email assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Start from an empty conversation
        #[arg(long)]
        reset: bool,

        /// Use a built-in sample mailbox instead of Gmail
        #[arg(long)]
        offline: bool,
    },

    /// List the email tools available to the assistant
    Tools,

    /// Diagnose configuration and connectivity
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate the config file
    Validate,
    /// Print the effective configuration with secrets redacted
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Chat output goes to stdout, so stay quiet unless asked
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            message,
            reset,
            offline,
        } => commands::chat::run(message, reset, offline).await?,
        Commands::Tools => commands::tools::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
