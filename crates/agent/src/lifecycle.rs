//! Install and activate.
//!
//! Install fills the current shell store from the precache manifest; every
//! URL settles on its own so one bad asset never blocks the rest. Activate
//! removes every store whose name is not current, which is how a version bump
//! in a store name invalidates the old generation.

use coldchain_client::resolve;
use coldchain_core::{AgentRequest, CacheStorage, Error, LifecycleState, Network};
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use url::Url;

/// Current lifecycle state, guarded against illegal transitions.
pub struct Lifecycle {
    state: RwLock<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { state: RwLock::new(LifecycleState::Parsed) }
    }
}

impl Lifecycle {
    pub async fn current(&self) -> LifecycleState {
        *self.state.read().await
    }

    /// Move to `next`, returning the previous state.
    pub async fn transition(&self, next: LifecycleState) -> Result<LifecycleState, Error> {
        let mut state = self.state.write().await;
        let from = *state;
        if !from.can_transition_to(next) {
            return Err(Error::InvalidTransition { from, to: next });
        }
        *state = next;
        tracing::info!(from = %from, to = %next, "lifecycle transition");
        Ok(from)
    }
}

/// A precache URL that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrecacheFailure {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InstallReport {
    pub cached: Vec<String>,
    pub failed: Vec<PrecacheFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
    /// Stale stores that could not be deleted; retried on the next activation.
    pub retained: Vec<String>,
}

/// Fetch and store every manifest entry, all-settle.
pub async fn precache(
    caches: &dyn CacheStorage, network: &dyn Network, store: &str, origin: &Url, manifest: &[String],
) -> InstallReport {
    let results = join_all(manifest.iter().map(|entry| precache_one(caches, network, store, origin, entry))).await;

    let mut report = InstallReport::default();
    for (entry, result) in manifest.iter().zip(results) {
        match result {
            Ok(url) => report.cached.push(url),
            Err(e) => {
                tracing::warn!(url = %entry, error = %e, "precache failed");
                report.failed.push(PrecacheFailure { url: entry.clone(), reason: e.to_string() });
            }
        }
    }
    report
}

async fn precache_one(
    caches: &dyn CacheStorage, network: &dyn Network, store: &str, origin: &Url, entry: &str,
) -> Result<String, Error> {
    let url = resolve(origin, entry).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let request = AgentRequest::get(url);
    let response = network.fetch(&request).await?;
    if !response.is_success() {
        return Err(Error::Network(format!("status {}", response.status)));
    }

    let key = request.key();
    let snapshot = response.snapshot(&key);
    caches.put(store, &key, &snapshot).await?;
    Ok(key.url)
}

/// Delete every store not named in `current`.
///
/// Failures are logged and reported, never retried.
pub async fn purge_stale(caches: &dyn CacheStorage, current: &[&str]) -> ActivateReport {
    let names = match caches.keys().await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(error = %e, "failed to enumerate stores; stale stores kept until next activation");
            return ActivateReport::default();
        }
    };

    let stale: Vec<String> = names.into_iter().filter(|n| !current.contains(&n.as_str())).collect();
    let results = join_all(stale.iter().map(|name| caches.delete(name))).await;

    let mut report = ActivateReport::default();
    for (name, result) in stale.into_iter().zip(results) {
        match result {
            Ok(_) => {
                tracing::info!(store = %name, "deleted stale store");
                report.deleted.push(name);
            }
            Err(e) => {
                tracing::warn!(store = %name, error = %e, "failed to delete stale store");
                report.retained.push(name);
            }
        }
    }
    report
}
