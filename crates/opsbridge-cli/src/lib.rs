pub mod commands;
pub mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `opsbridge_core=debug`)
pub const LOG_ENV: &str = "OPSBRIDGE_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "opsbridge",
    about = "Chat with an operations assistant backed by a remote MCP tool gateway",
    after_help = "Examples:\n  opsbridge chat\n  opsbridge chat --user dispatch@allpoints.example\n  opsbridge probe --tool get_exception_summary"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Config file (default: ~/.config/opsbridge/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the model provider (e.g. `mock` for an offline echo model)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Log through plain stderr lines instead of tracing
    #[arg(long, global = true)]
    pub console_log: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session (default)")]
    Chat {
        /// Skip the identification prompt
        #[arg(long)]
        user: Option<String>,
    },
    #[command(about = "Connect to the gateway, list tools, and optionally call one")]
    Probe {
        #[arg(long, default_value = "opsbridge-probe")]
        user: String,
        /// Tool to call after listing
        #[arg(long, default_value = "get_exception_summary")]
        tool: String,
        /// JSON object of tool arguments
        #[arg(long, default_value = "{}")]
        args: String,
        /// Only list tools
        #[arg(long)]
        list_only: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    if !cli.global.console_log {
        init_tracing();
    }

    let result = match cli.command.unwrap_or(Command::Chat { user: None }) {
        Command::Chat { user } => commands::chat::run(&cli.global, user).await,
        Command::Probe {
            user,
            tool,
            args,
            list_only,
        } => {
            let tool = (!list_only).then_some(tool);
            commands::probe::run(&cli.global, &user, tool.as_deref(), &args).await
        }
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}
