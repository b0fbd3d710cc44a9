//! Locator inspector MCP Server
//!
//! This binary provides a Model Context Protocol (MCP) server for Appium page source inspection.
//! It exposes tools that load a UI dump and suggest unique locators for its elements.

use anyhow::Context;
use clap::Parser;
use locator_inspector::config::{LocatorConfig, Platform};
use locator_inspector::mcp::LocatorServer;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locator-mcp")]
#[command(version)]
#[command(about = "Appium locator inspector MCP server", long_about = None)]
struct Cli {
    /// JSON file with locator configuration
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only suggest selectors for this platform
    #[arg(long, short = 'p')]
    platform: Option<Platform>,

    /// Treat sessions as a web/hybrid context (no accessibility ids)
    #[arg(long)]
    web: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LocatorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => LocatorConfig::default(),
    };
    if cli.web {
        config = config.native_context(false);
    }
    if let Some(platform) = cli.platform {
        config = config.platform(platform);
    }

    log::info!("Locator inspector MCP server v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Ready to accept MCP connections via stdio");

    let server = LocatorServer::with_config(config)
        .serve(stdio())
        .await
        .context("Failed to start MCP server")?;
    let quit_reason = server.waiting().await?;
    log::info!("Server quit with reason: {:?}", quit_reason);

    Ok(())
}
