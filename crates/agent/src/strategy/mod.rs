//! Caching strategies.
//!
//! - [`cache_first`]: stored snapshot if any, otherwise network (font store)
//! - [`network_first`]: network, then stored snapshot, then the navigation
//!   fallback document, then a synthetic 503 (shell store)

pub mod cache_first;
pub mod network_first;

use std::sync::Arc;

use coldchain_core::{CacheStorage, Network};

use crate::pending::ExtendableEvent;

pub use cache_first::cache_first;
pub use network_first::{ShellScope, network_first};

/// Collaborators a strategy may touch while handling one fetch event.
pub struct StrategyContext<'a> {
    pub caches: &'a Arc<dyn CacheStorage>,
    pub network: &'a dyn Network,
    pub event: &'a ExtendableEvent,
}
