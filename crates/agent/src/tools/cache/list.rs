//! cache_list tool implementation.
//!
//! Lists every store with its entry count and whether activation keeps it.

use coldchain_core::{AgentConfig, CacheDb, cache::stores::version_tag};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreInfo {
    pub name: String,
    pub version: Option<u32>,
    pub entries: u64,
    /// False for stores the next activation deletes.
    pub current: bool,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub stores: Vec<StoreInfo>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(cache: &CacheDb, config: &AgentConfig) -> Result<CallToolResult, McpError> {
    let current = config.current_caches();
    let mut stores = Vec::new();

    for name in cache.store_names().await? {
        let entries = cache.count_snapshots(&name).await?;
        stores.push(StoreInfo {
            version: version_tag(&name),
            entries,
            current: current.contains(&name.as_str()),
            name,
        });
    }

    json_result(&CacheListOutput { stores })
}
