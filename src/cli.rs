//! CLI argument parsing with subcommand architecture.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chat-relay", version, about = "Serverless-style relay for OpenAI chat models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the relay over HTTP (default when no subcommand is given)
    Run(RunArgs),
    /// Handle a single trigger event and print the resulting envelope
    Invoke(InvokeArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, default_value = "config.yaml", env = "CHAT_RELAY_CONFIG")]
    pub config: String,

    /// Listen host
    #[arg(long, env = "CHAT_RELAY_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "CHAT_RELAY_PORT")]
    pub port: Option<u16>,

    /// Log level
    #[arg(long, default_value = "info", env = "CHAT_RELAY_LOG_LEVEL")]
    pub log_level: String,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: "config.yaml".to_string(),
            host: None,
            port: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct InvokeArgs {
    /// Path to config file
    #[arg(short, long, default_value = "config.yaml", env = "CHAT_RELAY_CONFIG")]
    pub config: String,

    /// Trigger event JSON file, `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub event: String,

    /// Log level (logs go to stderr, the envelope to stdout)
    #[arg(long, default_value = "warn", env = "CHAT_RELAY_LOG_LEVEL")]
    pub log_level: String,
}
