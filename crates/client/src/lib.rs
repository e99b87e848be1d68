//! Network client for the ColdChain agent.
//!
//! This crate provides the reqwest-backed [`coldchain_core::Network`]
//! implementation and the URL helpers the router relies on.

pub mod fetch;

pub use fetch::{FetchConfig, HttpFetcher, UrlError, is_network_scheme, resolve, same_origin};
