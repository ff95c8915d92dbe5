//! Graph command handler

use anyhow::Result;
use colored::*;
use flowlog_client::FlowlogClient;

use super::format_timestamp;
use crate::config::Config;

/// Print the inferred service graph
pub async fn show_graph(config: &Config) -> Result<()> {
    let client = FlowlogClient::new(&config.server_url);
    let graph = client.graph().await?;

    if graph.nodes.is_empty() {
        println!("{}", "No services found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Services ({}):", graph.nodes.len()).bold());
    for node in &graph.nodes {
        println!(
            "  {} {} {}",
            "▸".cyan(),
            node.id.bold(),
            format!(
                "({} observation(s), last seen {})",
                node.observations,
                format_timestamp(node.last_seen)
            )
            .dimmed()
        );
    }

    println!();
    if graph.edges.is_empty() {
        println!("{}", "No dependencies found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Dependencies ({}):", graph.edges.len()).bold());
    println!("{}", "─".repeat(80).dimmed());
    for edge in &graph.edges {
        println!(
            "  {} {} {}  {}",
            edge.from.bold(),
            "→".cyan(),
            edge.to.bold(),
            format!(
                "x{} via {} (last seen {})",
                edge.count,
                edge.storages.join(", "),
                format_timestamp(edge.last_seen)
            )
            .dimmed()
        );
    }

    Ok(())
}
