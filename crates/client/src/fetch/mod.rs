//! HTTP fetch for the agent's network leg.
//!
//! ### Behavior
//! - Any HTTP status is returned as a response; strategies decide what a
//!   non-2xx status means.
//! - Transport failures (offline, DNS, refused) become `Error::Network`.
//! - No request timeout: a slow network yields a slow response, never a
//!   fallback.
//! - Max redirects: 5 (configurable)

pub mod url;

use async_trait::async_trait;
use reqwest::{Client, Method, header::HeaderMap};
use std::time::Instant;

pub use url::{UrlError, is_network_scheme, resolve, same_origin};

use coldchain_core::{AgentConfig, AgentRequest, Error, LiveResponse, Network};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "coldchain-agent/0.1")
    pub user_agent: String,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "coldchain-agent/0.1".to_string(), max_redirects: 5 }
    }
}

impl From<&AgentConfig> for FetchConfig {
    fn from(config: &AgentConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), max_redirects: config.max_redirects }
    }
}

/// reqwest-backed [`Network`].
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Network for HttpFetcher {
    async fn fetch(&self, request: &AgentRequest) -> Result<LiveResponse, Error> {
        let start = Instant::now();
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::InvalidInput(format!("invalid method: {}", request.method)))?;

        let mut builder = self.http.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(format!("{} {}: {}", request.method, request.url, e)))?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {}", e)))?;

        tracing::debug!(
            url = %request.url,
            status,
            bytes = body.len(),
            fetch_ms = start.elapsed().as_millis() as u64,
            "network fetch complete"
        );

        Ok(LiveResponse::new(status, headers, body))
    }
}

/// Response headers as name/value pairs.
///
/// Values that are not visible ASCII are kept, decoded lossily.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = match value.to_str() {
                Ok(v) => v.to_string(),
                Err(_) => {
                    tracing::debug!(header = %name, "non-ASCII header value, decoding lossily");
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                }
            };
            (name.to_string(), value)
        })
        .collect()
}
