//! URL resolution and origin checks for intercepted requests.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a request URL as the page would: relative to `base`.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Resolve relative references against `base`; absolute URLs keep their scheme
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder)
///
/// Non-network schemes are preserved so the router can decline them.
pub fn resolve(base: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Whether the URL can be fetched over the network at all.
pub fn is_network_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Same scheme, host and port.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
