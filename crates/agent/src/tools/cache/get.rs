//! cache_get tool implementation.
//!
//! Retrieves the snapshot stored for a request.

use coldchain_client::resolve;
use coldchain_core::{AgentConfig, CacheDb, Error, RequestKey};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::tools::{BodyView, json_result};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Request URL, absolute or relative to the application origin.
    pub url: String,

    /// Store to look in (default: the current shell store).
    #[serde(default)]
    pub store: Option<String>,

    /// HTTP method (default: GET).
    #[serde(default)]
    pub method: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub store: String,
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub cached_at: String,
    #[serde(flatten)]
    pub body: BodyView,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(
    cache: &CacheDb, config: &AgentConfig, origin: &Url, params: CacheGetParams,
) -> Result<CallToolResult, McpError> {
    let url = resolve(origin, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let key = RequestKey::new(params.method.as_deref().unwrap_or("GET"), &url);
    let store = params.store.unwrap_or_else(|| config.shell_cache.clone());

    let snapshot = cache
        .get_snapshot(&store, &key.hash)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{} {} in {}", key.method, key.url, store)))?;

    let output = CacheGetOutput {
        store,
        url: snapshot.url,
        status: snapshot.status,
        headers: snapshot.headers,
        cached_at: snapshot.cached_at,
        body: BodyView::new(&snapshot.body),
    };
    json_result(&output)
}
