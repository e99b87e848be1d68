//! Host platform contract.
//!
//! The agent never talks to a browser, a disk or a socket directly. It is
//! handed implementations of these traits: [`CacheStorage`] for named stores,
//! [`Network`] for fetches and [`Host`] for everything the host runtime does
//! on the agent's behalf (claiming tabs, showing notifications, windows).

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::{RequestKey, Snapshot};
use crate::http::{AgentRequest, LiveResponse};

/// Named, versioned key-value stores of response snapshots.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the store if it doesn't exist.
    async fn open(&self, name: &str) -> Result<(), Error>;

    /// Names of all existing stores.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Destroy a store with all its snapshots. Returns false if it didn't exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<Snapshot>, Error>;

    /// Store `snapshot` under `key`, replacing any previous snapshot and
    /// creating the store lazily.
    async fn put(&self, name: &str, key: &RequestKey, snapshot: &Snapshot) -> Result<(), Error>;
}

/// Network access.
///
/// Any HTTP status is a response; only transport failures are errors.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &AgentRequest) -> Result<LiveResponse, Error>;
}

/// A notification the host should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub tag: String,
    /// Page opened or focused when the notification is clicked.
    pub url: String,
}

/// An open application window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub focused: bool,
}

/// Runtime services of the host that runs the agent.
#[async_trait]
pub trait Host: Send + Sync {
    /// Activate this version without waiting for old tabs to close.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Take control of every open application instance.
    async fn claim(&self) -> Result<(), Error>;

    async fn show_notification(&self, notification: &Notification) -> Result<(), Error>;

    async fn close_notification(&self, tag: &str) -> Result<(), Error>;

    async fn match_all_windows(&self) -> Result<Vec<WindowClient>, Error>;

    async fn focus_window(&self, id: &str) -> Result<(), Error>;

    async fn open_window(&self, url: &str) -> Result<(), Error>;
}
