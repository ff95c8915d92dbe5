//! Log command handlers
//!
//! Writes single entries and batches, and lists stored entries for a
//! service or run.

use anyhow::Result;
use clap::Args;
use colored::*;
use flowlog_client::FlowlogClient;
use flowlog_core::domain::log::{Direction, LogEntry};
use flowlog_core::domain::page::Page;
use flowlog_core::dto::log::{LogBatch, LogRecord};
use flowlog_core::dto::query::ListQuery;

use super::format_timestamp;
use crate::config::Config;

/// Arguments for writing a single entry
#[derive(Args)]
pub struct LogArgs {
    /// Service ID
    service_id: String,

    /// Run ID
    run_id: String,

    /// User the entry is about
    #[arg(short, long)]
    user: String,

    /// Data flow direction: "in" (read) or "out" (write)
    #[arg(short, long)]
    direction: Direction,

    /// Storage the data moved through
    #[arg(short, long)]
    storage: String,

    /// Event time in milliseconds since the epoch (defaults to now)
    #[arg(short, long)]
    timestamp: Option<u64>,
}

/// Arguments for writing a batch
#[derive(Args)]
pub struct BatchArgs {
    /// Service ID
    service_id: String,

    /// Run ID
    run_id: String,

    /// Users the entries are about (comma separated or repeated)
    #[arg(short, long = "user", value_delimiter = ',', required = true)]
    users: Vec<String>,

    /// Data flow direction: "in" (read) or "out" (write)
    #[arg(short, long)]
    direction: Direction,

    /// Storage the data moved through
    #[arg(short, long)]
    storage: String,

    /// Event time in milliseconds since the epoch (defaults to now)
    #[arg(short, long)]
    timestamp: Option<u64>,
}

/// Arguments for listing entries
#[derive(Args)]
pub struct ListArgs {
    /// Service ID
    service_id: String,

    /// Run ID; lists every run of the service when omitted
    run_id: Option<String>,

    /// Cursor from a previous page
    #[arg(long, conflicts_with = "all")]
    cursor: Option<String>,

    /// Page size
    #[arg(short, long)]
    limit: Option<usize>,

    /// Follow pages until the listing is exhausted
    #[arg(short, long)]
    all: bool,
}

/// Write a single entry
pub async fn post_log(args: LogArgs, config: &Config) -> Result<()> {
    let client = FlowlogClient::new(&config.server_url);
    let record = LogRecord {
        user_id: args.user,
        timestamp: args.timestamp.unwrap_or_else(now_millis),
        direction: args.direction,
        storage: args.storage,
    };

    client
        .post_log(&args.service_id, &args.run_id, &record)
        .await?;

    println!(
        "{} Logged {} {} for {}/{}",
        "✓".green(),
        record.direction.to_string().cyan(),
        record.storage.bold(),
        args.service_id,
        args.run_id
    );
    Ok(())
}

/// Write a batch of entries sharing timestamp, direction and storage
pub async fn post_batch(args: BatchArgs, config: &Config) -> Result<()> {
    let client = FlowlogClient::new(&config.server_url);
    let batch = LogBatch {
        user_ids: args.users,
        timestamp: args.timestamp.unwrap_or_else(now_millis),
        direction: args.direction,
        storage: args.storage,
    };

    client
        .post_batch(&args.service_id, &args.run_id, &batch)
        .await?;

    println!(
        "{} Logged {} entries ({} {}) for {}/{}",
        "✓".green(),
        batch.user_ids.len(),
        batch.direction.to_string().cyan(),
        batch.storage.bold(),
        args.service_id,
        args.run_id
    );
    Ok(())
}

/// List entries for a run, or for a whole service when no run is given
pub async fn list_logs(args: ListArgs, config: &Config) -> Result<()> {
    let client = FlowlogClient::new(&config.server_url);

    if args.all {
        let entries = match &args.run_id {
            Some(run_id) => client.list_run_all(&args.service_id, run_id).await?,
            None => client.list_service_all(&args.service_id).await?,
        };
        print_entries(&entries);
        return Ok(());
    }

    let query = ListQuery {
        cursor: args.cursor,
        limit: args.limit,
    };
    let page = match &args.run_id {
        Some(run_id) => client.list_run(&args.service_id, run_id, &query).await?,
        None => client.list_service(&args.service_id, &query).await?,
    };
    print_page(&page);
    Ok(())
}

fn print_page(page: &Page<LogEntry>) {
    print_entries(&page.payload);

    if let Some(cursor) = &page.next_page {
        println!();
        println!("{} {}", "Next page:".dimmed(), cursor);
    }
}

fn print_entries(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("{}", "No log entries found.".yellow());
        return;
    }

    println!("{}", format!("Found {} entry(ies):", entries.len()).bold());
    println!("{}", "─".repeat(80).dimmed());

    for entry in entries {
        println!(
            "{} {}  {}/{}  {} {:<3} {}",
            "▸".cyan(),
            format_timestamp(entry.timestamp).dimmed(),
            entry.service_id,
            entry.run_id,
            entry.user_id.bold(),
            direction_label(entry.direction),
            entry.storage
        );
    }
}

fn direction_label(direction: Direction) -> ColoredString {
    match direction {
        Direction::In => "in".green(),
        Direction::Out => "out".blue(),
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
