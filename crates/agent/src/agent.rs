//! The caching agent: one value per deployed version.
//!
//! Each method handles one host event. Long-running side effects are
//! registered on the [`ExtendableEvent`] passed in; callers must await
//! [`ExtendableEvent::settled`] before acknowledging the event.

use std::sync::Arc;

use coldchain_client::resolve;
use coldchain_core::{
    AgentConfig, AgentRequest, CacheStorage, Error, Host, LifecycleState, LiveResponse, Network, Notification,
    RequestKey,
};
use serde_json::{Value, json};
use url::Url;

use crate::lifecycle::{self, ActivateReport, InstallReport, Lifecycle};
use crate::notify::{self, ClickOutcome};
use crate::pending::ExtendableEvent;
use crate::router::{Route, classify};
use crate::strategy::{ShellScope, StrategyContext, cache_first, network_first};
use crate::sync::{NoopQueueFlush, QueueFlush, on_sync};

/// Result of a fetch event.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The agent does not handle this request.
    Passthrough,
    Respond(LiveResponse),
}

pub struct ColdChainAgent {
    config: AgentConfig,
    origin: Url,
    fallback: RequestKey,
    caches: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    queue: Arc<dyn QueueFlush>,
    lifecycle: Lifecycle,
}

impl ColdChainAgent {
    pub fn new(config: AgentConfig, caches: Arc<dyn CacheStorage>, network: Arc<dyn Network>) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        let fallback_url =
            resolve(&origin, &config.fallback_document).map_err(|e| Error::InvalidUrl(format!("fallback: {e}")))?;
        let fallback = RequestKey::new("GET", &fallback_url);

        Ok(Self {
            config,
            origin,
            fallback,
            caches,
            network,
            queue: Arc::new(NoopQueueFlush),
            lifecycle: Lifecycle::default(),
        })
    }

    /// Replace the no-op offline queue flush.
    pub fn with_queue(mut self, queue: Arc<dyn QueueFlush>) -> Self {
        self.queue = queue;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub async fn state(&self) -> LifecycleState {
        self.lifecycle.current().await
    }

    /// Populate the shell store, then ask the host to skip waiting.
    ///
    /// Only a failure to open the shell store fails the install (and makes
    /// this version redundant); individual precache failures are reported.
    pub async fn install(&self, _event: &ExtendableEvent, host: &dyn Host) -> Result<InstallReport, Error> {
        self.lifecycle.transition(LifecycleState::Installing).await?;

        if let Err(e) = self.caches.open(&self.config.shell_cache).await {
            tracing::error!(store = %self.config.shell_cache, error = %e, "cannot open shell store");
            self.lifecycle.transition(LifecycleState::Redundant).await?;
            return Err(e);
        }

        let report = lifecycle::precache(
            self.caches.as_ref(),
            self.network.as_ref(),
            &self.config.shell_cache,
            &self.origin,
            &self.config.precache,
        )
        .await;
        tracing::info!(cached = report.cached.len(), failed = report.failed.len(), "precache finished");

        self.lifecycle.transition(LifecycleState::Waiting).await?;

        if let Err(e) = host.skip_waiting().await {
            tracing::warn!(error = %e, "skip waiting rejected; activation waits for old clients");
        }

        Ok(report)
    }

    /// Purge stale stores and claim every open client.
    pub async fn activate(&self, _event: &ExtendableEvent, host: &dyn Host) -> Result<ActivateReport, Error> {
        self.lifecycle.transition(LifecycleState::Activating).await?;

        let report = lifecycle::purge_stale(self.caches.as_ref(), &self.config.current_caches()).await;

        if let Err(e) = host.claim().await {
            tracing::warn!(error = %e, "failed to claim clients; open tabs switch on reload");
        }

        self.lifecycle.transition(LifecycleState::Active).await?;
        Ok(report)
    }

    /// Route an intercepted request.
    ///
    /// Requests are only intercepted while this version is active.
    pub async fn fetch(&self, event: &ExtendableEvent, request: &AgentRequest) -> Result<FetchOutcome, Error> {
        let state = self.state().await;
        if state != LifecycleState::Active {
            tracing::debug!(state = %state, url = %request.url, "not active, passing request through");
            return Ok(FetchOutcome::Passthrough);
        }

        let ctx = StrategyContext { caches: &self.caches, network: self.network.as_ref(), event };

        let response = match classify(request, &self.config) {
            Route::Passthrough => return Ok(FetchOutcome::Passthrough),
            Route::CacheFirst { store } => cache_first(&ctx, store, request).await?,
            Route::NetworkFirst { store } => {
                let shell = ShellScope { store, origin: &self.origin, fallback: &self.fallback };
                network_first(&ctx, &shell, request).await
            }
        };

        Ok(FetchOutcome::Respond(response))
    }

    /// Show the notification described by a push payload.
    pub async fn push(
        &self, _event: &ExtendableEvent, host: &dyn Host, payload: Option<&str>,
    ) -> Result<Notification, Error> {
        let notification = notify::parse_push(payload);
        host.show_notification(&notification).await?;
        Ok(notification)
    }

    pub async fn notification_click(
        &self, _event: &ExtendableEvent, host: &dyn Host, tag: Option<&str>, url: Option<&str>,
    ) -> Result<ClickOutcome, Error> {
        notify::notification_click(host, &self.origin, tag, url).await
    }

    /// Returns whether the tag matched the configured sync tag.
    pub async fn sync(&self, _event: &ExtendableEvent, tag: &str) -> Result<bool, Error> {
        on_sync(self.queue.as_ref(), &self.config.sync_tag, tag).await
    }

    /// Handle a message posted by a page.
    ///
    /// `SKIP_WAITING` asks the host to activate this version now;
    /// `GET_VERSION` replies with the current store names.
    pub async fn message(&self, _event: &ExtendableEvent, host: &dyn Host, data: &Value) -> Result<Option<Value>, Error> {
        match data.get("type").and_then(Value::as_str) {
            Some("SKIP_WAITING") => {
                host.skip_waiting().await?;
                Ok(None)
            }
            Some("GET_VERSION") => Ok(Some(json!({
                "shell_cache": self.config.shell_cache,
                "font_cache": self.config.font_cache,
            }))),
            other => {
                tracing::debug!(kind = ?other, "ignoring message");
                Ok(None)
            }
        }
    }
}
