//! KOLBR Analyst MCP Server
//!
//! Model Context Protocol server that lets AI agents pull real trades made by
//! Brazilian KOLs on Solana and have them scored by the KOLBR Analyst.
//!
//! # Tools
//!
//! - **kolbr_fetch_recent**: latest trade from the recent-trades feed
//! - **kolbr_find_by_wallet**: latest trade made by a given KOL wallet
//! - **kolbr_run_analysis**: verdict, confidence and risk for a trade, with a
//!   loading notification sent before the result
//! - **kolbr_health**: reachability of the KOLBR API

mod client;
mod config;
mod error;
mod locator;
mod pipeline;
mod tools;

#[cfg(test)]
mod testing;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::client::KolbrClient;
use crate::config::AppConfig;
use crate::tools::{handle_request, JsonRpcNotification, JsonRpcRequest, KolbrTools};

fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("kolbr_mcp=info")
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting KOLBR Analyst MCP Server v{}", env!("CARGO_PKG_VERSION"));

    // Create Tokio runtime
    let rt = Runtime::new()?;

    // Load configuration
    let config = AppConfig::load()
        .map_err(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            e
        })
        .unwrap_or_default();

    tracing::info!(
        fetch_timeout_seconds = config.api.fetch_timeout_seconds,
        analyze_timeout_seconds = config.api.analyze_timeout_seconds,
        "Configuration loaded"
    );

    let client = Arc::new(KolbrClient::new(&config.api)?);
    tracing::info!(base_url = %client.base_url(), "KOLBR API client ready");
    let tools = KolbrTools::new(client, &config.api);

    tracing::info!("MCP server ready, listening on stdio");

    // Main loop: read JSON-RPC requests from stdin, write responses to stdout
    let stdin = io::stdin();

    let notify = |notification: JsonRpcNotification| {
        let line = serde_json::to_string(&notification).unwrap_or_default();
        write_line(&line);
    };

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "Error reading stdin");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, line = %line, "Error parsing request");
                continue;
            }
        };

        tracing::debug!(method = %request.method, "Received request");

        let response = rt.block_on(handle_request(&tools, request, &notify));

        // Only send response if one was produced (notifications don't get responses)
        if let Some(response) = response {
            let response_str = serde_json::to_string(&response).unwrap_or_default();
            write_line(&response_str);
        }
    }

    tracing::info!("MCP server shutting down");
    Ok(())
}

fn write_line(line: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", line) {
        tracing::error!(error = %e, "Error writing to stdout");
    }
    if let Err(e) = stdout.flush() {
        tracing::error!(error = %e, "Error flushing stdout");
    }
}
