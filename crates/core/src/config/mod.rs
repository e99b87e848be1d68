//! Agent configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (COLDCHAIN_*)
//! 2. TOML config file (if COLDCHAIN_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Agent configuration with layered loading.
///
/// Changing either store name forces the next activation to purge every
/// store carrying the old name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Origin of the application the agent serves, e.g. `https://app.coldchain.example`.
    ///
    /// Relative manifest entries and notification URLs resolve against it.
    /// Set via COLDCHAIN_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to SQLite database backing the cache stores.
    ///
    /// Set via COLDCHAIN_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Versioned name of the application-shell store.
    ///
    /// Set via COLDCHAIN_SHELL_CACHE environment variable.
    #[serde(default = "default_shell_cache")]
    pub shell_cache: String,

    /// Versioned name of the third-party font store.
    ///
    /// Set via COLDCHAIN_FONT_CACHE environment variable.
    #[serde(default = "default_font_cache")]
    pub font_cache: String,

    /// Precache manifest: URLs stored in the shell store during install.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Main document served to offline navigations that have no snapshot.
    #[serde(default = "default_fallback_document")]
    pub fallback_document: String,

    /// Hosts whose assets are served cache-first from the font store.
    #[serde(default = "default_font_hosts")]
    pub font_hosts: Vec<String>,

    /// Background-sync tag that triggers the offline queue flush.
    ///
    /// Set via COLDCHAIN_SYNC_TAG environment variable.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    /// User-Agent string for network fetches.
    ///
    /// Set via COLDCHAIN_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of redirects followed per fetch.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./coldchain-cache.sqlite")
}

fn default_shell_cache() -> String {
    "coldchain-shell-v1".into()
}

fn default_font_cache() -> String {
    "coldchain-fonts-v1".into()
}

fn default_precache() -> Vec<String> {
    ["/", "/index.html", "/manifest.json", "/icons/icon-192x192.png", "/icons/icon-512x512.png"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_fallback_document() -> String {
    "/index.html".into()
}

fn default_font_hosts() -> Vec<String> {
    vec!["fonts.googleapis.com".into(), "fonts.gstatic.com".into()]
}

fn default_sync_tag() -> String {
    "sync-movements".into()
}

fn default_user_agent() -> String {
    "coldchain-agent/0.1".into()
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            db_path: default_db_path(),
            shell_cache: default_shell_cache(),
            font_cache: default_font_cache(),
            precache: default_precache(),
            fallback_document: default_fallback_document(),
            font_hosts: default_font_hosts(),
            sync_tag: default_sync_tag(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `COLDCHAIN_`
    /// 2. TOML file from `COLDCHAIN_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("COLDCHAIN_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("COLDCHAIN_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parsed application origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` is not an absolute URL.
    pub fn origin_url(&self) -> Result<url::Url, ConfigError> {
        url::Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })
    }

    /// The store names activation keeps; every other store is stale.
    pub fn current_caches(&self) -> [&str; 2] {
        [self.shell_cache.as_str(), self.font_cache.as_str()]
    }

    /// Whether `host` belongs to a third-party font provider.
    pub fn is_font_host(&self, host: &str) -> bool {
        self.font_hosts.iter().any(|h| h.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./coldchain-cache.sqlite"));
        assert_eq!(config.shell_cache, "coldchain-shell-v1");
        assert_eq!(config.font_cache, "coldchain-fonts-v1");
        assert_eq!(config.fallback_document, "/index.html");
        assert!(config.precache.contains(&"/index.html".to_string()));
        assert_eq!(config.sync_tag, "sync-movements");
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_current_caches() {
        let config = AgentConfig::default();
        assert_eq!(config.current_caches(), ["coldchain-shell-v1", "coldchain-fonts-v1"]);
    }

    #[test]
    fn test_is_font_host_case_insensitive() {
        let config = AgentConfig::default();
        assert!(config.is_font_host("fonts.gstatic.com"));
        assert!(config.is_font_host("Fonts.GoogleApis.com"));
        assert!(!config.is_font_host("cdn.example.com"));
    }

    #[test]
    fn test_origin_url() {
        let config = AgentConfig::default();
        assert_eq!(config.origin_url().unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_load_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("COLDCHAIN_SHELL_CACHE", "coldchain-shell-v7");
            jail.set_env("COLDCHAIN_ORIGIN", "https://app.coldchain.example");

            let config = AgentConfig::load().expect("config loads");
            assert_eq!(config.shell_cache, "coldchain-shell-v7");
            assert_eq!(config.origin, "https://app.coldchain.example");
            assert_eq!(config.font_cache, "coldchain-fonts-v1");
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "agent.toml",
                r#"
                    origin = "https://app.coldchain.example"
                    precache = ["/", "/index.html"]
                    font_hosts = ["fonts.bunny.net"]
                "#,
            )?;
            jail.set_env("COLDCHAIN_CONFIG_FILE", "agent.toml");

            let config = AgentConfig::load().expect("config loads");
            assert_eq!(config.precache, vec!["/".to_string(), "/index.html".to_string()]);
            assert!(config.is_font_host("fonts.bunny.net"));
            assert!(!config.is_font_host("fonts.gstatic.com"));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("COLDCHAIN_FONT_CACHE", "fonts");
            assert!(matches!(AgentConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
