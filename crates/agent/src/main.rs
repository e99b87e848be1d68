//! coldchain-agent entry point.
//!
//! Boots the offline caching agent as an MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use coldchain_client::{FetchConfig, HttpFetcher};
use coldchain_core::{AgentConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod agent;
mod handler;
mod host;
mod lifecycle;
mod notify;
mod pending;
mod router;
mod strategy;
mod sync;
#[cfg(test)]
mod testing;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AgentConfig::load()?;
    let cache = CacheDb::open(&config.db_path).await?;
    let fetcher = HttpFetcher::new(FetchConfig::from(&config))?;

    tracing::info!(
        origin = %config.origin,
        shell_cache = %config.shell_cache,
        font_cache = %config.font_cache,
        "Starting coldchain-agent on stdio transport"
    );

    let agent = agent::ColdChainAgent::new(config, Arc::new(cache.clone()), Arc::new(fetcher))?
        .with_queue(Arc::new(sync::NoopQueueFlush));
    let handler = handler::ColdChainServer::new(Arc::new(agent), cache);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
