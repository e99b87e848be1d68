//! Push and notification-click handling.
//!
//! Rendering is the host's job; this module only decides what to show and
//! which window to bring forward.

use coldchain_client::resolve;
use coldchain_core::{Error, Host, Notification};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

const DEFAULT_TITLE: &str = "ColdChain";
const DEFAULT_BODY: &str = "You have a new notification";
const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
const DEFAULT_TAG: &str = "coldchain-notification";
const DEFAULT_URL: &str = "/";

/// Build the notification for a push payload.
///
/// A missing, malformed or non-object payload is treated as `{}`; every
/// missing or non-string field falls back to its default.
pub fn parse_push(payload: Option<&str>) -> Notification {
    let data = match payload.map(str::trim).filter(|p| !p.is_empty()) {
        None => Value::Null,
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "push payload is not valid JSON, using defaults");
            Value::Null
        }),
    };

    let field = |name: &str, default: &str| data.get(name).and_then(Value::as_str).unwrap_or(default).to_string();

    Notification {
        title: field("title", DEFAULT_TITLE),
        body: field("body", DEFAULT_BODY),
        icon: field("icon", DEFAULT_ICON),
        tag: field("tag", DEFAULT_TAG),
        url: field("url", DEFAULT_URL),
    }
}

/// What a notification click did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutcome {
    Focused { id: String },
    Opened { url: String },
}

/// Close the clicked notification and focus or open the window for `url`.
pub async fn notification_click(
    host: &dyn Host, origin: &Url, tag: Option<&str>, url: Option<&str>,
) -> Result<ClickOutcome, Error> {
    host.close_notification(tag.unwrap_or(DEFAULT_TAG)).await?;

    let target = resolve(origin, url.unwrap_or(DEFAULT_URL)).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let windows = host.match_all_windows().await?;
    let existing = windows
        .iter()
        .find(|w| resolve(origin, &w.url).is_ok_and(|open| open == target));

    match existing {
        Some(window) => {
            host.focus_window(&window.id).await?;
            Ok(ClickOutcome::Focused { id: window.id.clone() })
        }
        None => {
            host.open_window(target.as_str()).await?;
            Ok(ClickOutcome::Opened { url: target.into() })
        }
    }
}
