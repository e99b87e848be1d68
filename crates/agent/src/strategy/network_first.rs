//! Network-first strategy for the application's own assets.

use coldchain_client::same_origin;
use coldchain_core::{AgentRequest, LiveResponse, RequestKey};
use url::Url;

use super::StrategyContext;

/// The shell store and what the strategy needs to decide about it.
pub struct ShellScope<'a> {
    pub store: &'a str,
    /// Only responses from this origin are written to the store.
    pub origin: &'a Url,
    /// Key of the precached main document served to offline navigations.
    pub fallback: &'a RequestKey,
}

/// Fetch `request`, keeping the shell store fresh and falling back to it offline.
///
/// Always produces a response. Successful same-origin responses are written to
/// the store in the background; the write is registered on the event and its
/// outcome never reaches the caller.
pub async fn network_first(ctx: &StrategyContext<'_>, shell: &ShellScope<'_>, request: &AgentRequest) -> LiveResponse {
    let key = request.key();

    let error = match ctx.network.fetch(request).await {
        Ok(response) => {
            if response.is_success() && same_origin(&request.url, shell.origin) {
                let snapshot = response.snapshot(&key);
                let caches = ctx.caches.clone();
                let store = shell.store.to_string();
                ctx.event.wait_until(async move {
                    if let Err(e) = caches.put(&store, &key, &snapshot).await {
                        tracing::warn!(store, url = %key.url, error = %e, "failed to refresh snapshot");
                    }
                });
            }
            return response;
        }
        Err(e) => e,
    };

    tracing::debug!(url = %key.url, error = %error, "network failed, trying shell store");

    if let Some(snapshot) = lookup(ctx, shell.store, &key).await {
        return snapshot.into();
    }

    if request.is_navigation()
        && let Some(document) = lookup(ctx, shell.store, shell.fallback).await
    {
        tracing::debug!(url = %key.url, fallback = %shell.fallback.url, "serving fallback document");
        return document.into();
    }

    tracing::debug!(url = %key.url, "offline and not cached");
    LiveResponse::offline()
}

async fn lookup(ctx: &StrategyContext<'_>, store: &str, key: &RequestKey) -> Option<coldchain_core::Snapshot> {
    match ctx.caches.match_request(store, key).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(store, url = %key.url, error = %e, "shell store lookup failed");
            None
        }
    }
}
