//! Request identity keys.

use sha2::{Digest, Sha256};
use url::Url;

/// Identity of a request inside a cache store.
///
/// Only the method and the fragment-less URL participate; request headers
/// never vary the key, so two requests for the same font URL with different
/// `Accept` headers share one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
    pub hash: String,
}

impl RequestKey {
    pub fn new(method: &str, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        let method = method.to_ascii_uppercase();
        let hash = compute_request_key(&method, url.as_str());
        Self { method, url: url.into(), hash }
    }
}

/// Compute the hex SHA-256 key for a method and URL.
pub fn compute_request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_request_key("GET", "https://example.com/");
        let hash2 = compute_request_key("GET", "https://example.com/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_method() {
        let get = compute_request_key("GET", "https://example.com/");
        let head = compute_request_key("HEAD", "https://example.com/");
        assert_ne!(get, head);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_request_key("GET", "https://example.com/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_ignores_fragment() {
        let a = RequestKey::new("GET", &url("https://example.com/app#/inventory"));
        let b = RequestKey::new("GET", &url("https://example.com/app"));
        assert_eq!(a, b);
        assert_eq!(a.url, "https://example.com/app");
    }

    #[test]
    fn test_key_normalizes_method_case() {
        let a = RequestKey::new("get", &url("https://example.com/"));
        assert_eq!(a.method, "GET");
        assert_eq!(a.hash, RequestKey::new("GET", &url("https://example.com/")).hash);
    }

    #[test]
    fn test_key_keeps_query() {
        let a = RequestKey::new("GET", &url("https://fonts.googleapis.com/css2?family=Inter"));
        let b = RequestKey::new("GET", &url("https://fonts.googleapis.com/css2?family=Roboto"));
        assert_ne!(a.hash, b.hash);
    }
}
