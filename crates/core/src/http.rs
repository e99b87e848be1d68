//! Intercepted requests and live responses.
//!
//! A [`LiveResponse`] is handed to exactly one consumer. Code that both
//! returns a response and stores it takes a [`Snapshot`] first, which owns an
//! independent copy of the body.

use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::hash::RequestKey;
use crate::cache::snapshots::Snapshot;

/// Body of the synthetic response for offline requests with nothing cached.
pub const OFFLINE_BODY: &str = "Offline — resource not cached";

/// How the requester issued the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level page navigation.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// An outgoing request intercepted by the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
}

impl AgentRequest {
    /// Plain GET request with no extra headers.
    pub fn get(url: Url) -> Self {
        Self { method: "GET".into(), url, mode: RequestMode::Cors, headers: Vec::new() }
    }

    /// Top-level navigation to `url`.
    pub fn navigate(url: Url) -> Self {
        Self { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Cache key for this request (method and URL only, headers never vary it).
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }
}

/// Where a response handed back to the requester came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Network,
    Cache,
    Synthetic,
}

/// A response on its way to the requester.
///
/// Deliberately not `Clone`: the body is single-consumption.
#[derive(Debug)]
pub struct LiveResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub source: ResponseSource,
    body: Bytes,
}

impl LiveResponse {
    /// Response that arrived from the network.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self { status, headers, source: ResponseSource::Network, body: body.into() }
    }

    /// The synthetic 503 returned when the network is down and nothing is cached.
    pub fn offline() -> Self {
        Self {
            status: 503,
            headers: vec![("Content-Type".into(), "text/plain".into())],
            source: ResponseSource::Synthetic,
            body: Bytes::from_static(OFFLINE_BODY.as_bytes()),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Capture an immutable copy of this response for storage under `key`.
    pub fn snapshot(&self, key: &RequestKey) -> Snapshot {
        Snapshot {
            hash: key.hash.clone(),
            method: key.method.clone(),
            url: key.url.clone(),
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.to_vec(),
            cached_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<Snapshot> for LiveResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            status: snapshot.status,
            headers: snapshot.headers,
            source: ResponseSource::Cache,
            body: Bytes::from(snapshot.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_offline_response() {
        let response = LiveResponse::offline();
        assert_eq!(response.status, 503);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.body(), "Offline — resource not cached".as_bytes());
        assert_eq!(response.source, ResponseSource::Synthetic);
    }

    #[test]
    fn test_is_success_bounds() {
        assert!(LiveResponse::new(200, vec![], "").is_success());
        assert!(LiveResponse::new(204, vec![], "").is_success());
        assert!(!LiveResponse::new(304, vec![], "").is_success());
        assert!(!LiveResponse::new(199, vec![], "").is_success());
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let request = AgentRequest::get(url("https://app.example/app.js"));
        let response = LiveResponse::new(200, vec![("ETag".into(), "\"abc\"".into())], "console.log(1)");

        let snapshot = response.snapshot(&request.key());
        let body = response.into_body();

        assert_eq!(snapshot.body, body.to_vec());
        assert_eq!(snapshot.url, "https://app.example/app.js");
        assert_eq!(snapshot.method, "GET");
        assert_eq!(snapshot.headers, vec![("ETag".to_string(), "\"abc\"".to_string())]);
    }

    #[test]
    fn test_snapshot_into_response_marks_cache_source() {
        let request = AgentRequest::get(url("https://app.example/"));
        let snapshot = LiveResponse::new(200, vec![], "<html>").snapshot(&request.key());

        let response = LiveResponse::from(snapshot);
        assert_eq!(response.source, ResponseSource::Cache);
        assert_eq!(response.body(), b"<html>");
    }

    #[test]
    fn test_navigate_constructor() {
        let request = AgentRequest::navigate(url("https://app.example/inventory"));
        assert!(request.is_navigation());
        assert_eq!(request.method, "GET");
    }

    #[test]
    fn test_request_mode_serde() {
        let mode: RequestMode = serde_json::from_str("\"no-cors\"").unwrap();
        assert_eq!(mode, RequestMode::NoCors);
        assert_eq!(RequestMode::default(), RequestMode::Cors);
    }
}
