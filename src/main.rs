//! pg-agent-tool - Main entry point.
//!
//! Serves `PostgresTool` over MCP, or runs a single command with `--command`
//! and prints the result.

use clap::Parser;
use pg_agent_tool::config::{Config, TransportMode};
use pg_agent_tool::tools::PostgresTool;
use pg_agent_tool::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber. Output always goes to stderr.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    if config.enable_logs {
        init_tracing(&config);
    }

    let settings = config.connection_settings();
    settings.validate()?;

    info!(
        db = %settings.display_target(),
        schema = %settings.schema,
        "Starting pg-agent-tool v{}",
        env!("CARGO_PKG_VERSION")
    );

    let tool = Arc::new(PostgresTool::new(settings));

    if let Some(input) = config.one_shot_input() {
        let output = tool.run(input).await;
        tool.close().await;
        println!("{}", output);
        return Ok(());
    }

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(tool);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                tool,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
