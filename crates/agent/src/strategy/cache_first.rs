//! Cache-first strategy for immutable third-party assets.

use coldchain_core::{AgentRequest, Error, LiveResponse};

use super::StrategyContext;

/// Serve `request` from `store`, falling back to the network on a miss.
///
/// A hit never touches the network and is never checked for staleness. A
/// network failure on a miss is returned to the caller as is.
pub async fn cache_first(ctx: &StrategyContext<'_>, store: &str, request: &AgentRequest) -> Result<LiveResponse, Error> {
    let key = request.key();

    if let Err(e) = ctx.caches.open(store).await {
        tracing::warn!(store, error = %e, "failed to open store, going to network");
    }

    match ctx.caches.match_request(store, &key).await {
        Ok(Some(snapshot)) => {
            tracing::debug!(store, url = %key.url, "cache hit");
            return Ok(snapshot.into());
        }
        Ok(None) => tracing::debug!(store, url = %key.url, "cache miss"),
        Err(e) => tracing::warn!(store, url = %key.url, error = %e, "cache lookup failed, treating as miss"),
    }

    let response = ctx.network.fetch(request).await?;

    if response.is_success() {
        let snapshot = response.snapshot(&key);
        if let Err(e) = ctx.caches.put(store, &key, &snapshot).await {
            tracing::warn!(store, url = %key.url, error = %e, "failed to store snapshot");
        }
    }

    Ok(response)
}
