mod assemble;
mod catalog;
mod config;
mod error;
mod matcher;
mod model;
mod parser;
mod repository;
mod server;
mod service;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use uma_common::http::{PageClient, PageClientConfig};

use config::Config;
use repository::CharacterRepository;
use server::UmaScrapeServer;
use service::CharacterService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting umascrape MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        base_url = %config.base_url,
        race_list_url = %config.race_list_url,
        "configuration loaded"
    );

    let http_config = PageClientConfig::from_env();
    info!(
        timeout_ms = http_config.default_timeout.as_millis() as u64,
        user_agent = %http_config.user_agent,
        "http client configured"
    );
    let client = PageClient::new(http_config)?;

    // 2. Load the race catalog once; it is immutable for the process lifetime
    let catalog = match catalog::load_catalog(&client, &config.race_list_url).await {
        Ok(races) => races,
        Err(e) => {
            warn!(error = %e, "failed to load race catalog");
            Vec::new()
        }
    };
    if catalog.is_empty() {
        warn!("race catalog is empty, race matching will return no results");
    } else {
        info!(races = catalog.len(), "race catalog loaded");
    }

    // 3. Load the character lookup table
    let repo = CharacterRepository::load(&config.character_data_file);
    info!(characters = repo.count(), "character repository ready");

    // 4. Build the service and serve on stdio
    let service = CharacterService::new(client, repo, Arc::new(catalog), config);
    let server = UmaScrapeServer::new(Arc::new(service));

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
