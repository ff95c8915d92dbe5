//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod graph;
mod log;

pub use log::{BatchArgs, ListArgs, LogArgs};

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowlog_client::FlowlogClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Write a single log entry
    Log(LogArgs),
    /// Write one entry per userID in a single request
    Batch(BatchArgs),
    /// List entries for a service or one of its runs
    Logs(ListArgs),
    /// Show the inferred service graph
    Graph,
    /// Check that the server is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Log(args) => log::post_log(args, config).await,
        Commands::Batch(args) => log::post_batch(args, config).await,
        Commands::Logs(args) => log::list_logs(args, config).await,
        Commands::Graph => graph::show_graph(config).await,
        Commands::Health => check_health(config).await,
    }
}

async fn check_health(config: &Config) -> Result<()> {
    let client = FlowlogClient::new(&config.server_url);
    client.health().await?;

    println!("{} {}", "✓".green(), format!("{} is up", client.base_url()).bold());
    Ok(())
}

/// Format a millisecond timestamp for display
pub(crate) fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00.000");
        assert_eq!(format_timestamp(1_500), "1970-01-01 00:00:01.500");
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
    }
}
