//! Flowlog CLI
//!
//! Command-line interface for writing to and querying a Flowlog server.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "flowlog")]
#[command(about = "Flowlog service log and dependency graph CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "FLOWLOG_SERVER_URL", default_value = "http://localhost:3000")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
