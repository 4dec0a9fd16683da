//! Costbot CLI
//!
//! Main entry point for the costbot command-line tool.
//! Answers cloud cost questions from the AWS Made Easy livestream and
//! CloudFix blog knowledge base, with cited sources.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, FilterCommand};
use costbot_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Costbot - cited answers from the AWS Made Easy knowledge base
#[derive(Parser, Debug)]
#[command(name = "costbot")]
#[command(about = "Cited answers from the AWS Made Easy knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "COSTBOT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "COSTBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Knowledge base identifier
    #[arg(long, global = true, env = "AME_KB_ID")]
    kb_id: Option<String>,

    /// Foundation model identifier
    #[arg(short, long, global = true, env = "COSTBOT_MODEL")]
    model: Option<String>,

    /// Region of the knowledge base and model
    #[arg(long, global = true, env = "COSTBOT_REGION")]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question
    Ask(AskCommand),

    /// Ask questions interactively
    Chat(ChatCommand),

    /// Show the retrieval configuration without querying
    Filter(FilterCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // A local .env takes precedence over the shell environment
    let dotenv = dotenvy::dotenv_override();

    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace, cli.config)?;

    let config = config.with_overrides(
        cli.kb_id,
        cli.model,
        cli.region,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Costbot CLI starting");
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Model: {} in {}", config.model_id, config.region);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Filter(_) => "filter",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Filter(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
