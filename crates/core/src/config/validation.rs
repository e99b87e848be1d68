//! Configuration validation rules.
//!
//! This module provides validation logic for `AgentConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::cache::stores::version_tag;
use crate::config::AgentConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AgentConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `origin` is not an absolute http(s) URL
    /// - a store name lacks a `-v<N>` version tag, or both names are equal
    /// - the precache manifest contains an empty entry
    /// - `user_agent` is empty
    /// - `max_redirects` exceeds 20
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.origin_url()?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "origin".into(),
                reason: format!("unsupported scheme: {}", origin.scheme()),
            });
        }

        for (field, name) in [("shell_cache", &self.shell_cache), ("font_cache", &self.font_cache)] {
            if version_tag(name).is_none() {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: format!("'{name}' must end with a version tag like -v1"),
                });
            }
        }
        if self.shell_cache == self.font_cache {
            return Err(ConfigError::Invalid { field: "font_cache".into(), reason: "must differ from shell_cache".into() });
        }

        if self.precache.iter().any(|u| u.trim().is_empty()) {
            return Err(ConfigError::Invalid { field: "precache".into(), reason: "entries must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if !self.precache.contains(&self.fallback_document) {
            tracing::warn!(
                fallback_document = %self.fallback_document,
                "fallback_document is not in the precache manifest; \
                 offline navigations will get the 503 response until it is cached"
            );
        }

        Ok(())
    }
}
