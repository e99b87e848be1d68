//! Request classification.
//!
//! Third-party font assets are treated as immutable and served cache-first;
//! everything else that qualifies prefers the network.

use coldchain_client::is_network_scheme;
use coldchain_core::{AgentConfig, AgentRequest};

/// What the agent does with an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Not intercepted; the host performs the request itself.
    Passthrough,
    CacheFirst { store: &'a str },
    NetworkFirst { store: &'a str },
}

/// Pick the route for `request`.
pub fn classify<'a>(request: &AgentRequest, config: &'a AgentConfig) -> Route<'a> {
    if !request.method.eq_ignore_ascii_case("GET") || !is_network_scheme(&request.url) {
        return Route::Passthrough;
    }

    match request.url.host_str() {
        Some(host) if config.is_font_host(host) => Route::CacheFirst { store: &config.font_cache },
        _ => Route::NetworkFirst { store: &config.shell_cache },
    }
}
