//! MCP tool implementations.
//!
//! Each host event is delivered as a tool call. A tool builds the event,
//! runs the agent handler, waits for the event's pending work to settle and
//! only then replies with the outcome and the directives the host must carry
//! out.

pub mod cache;
pub mod events;
pub mod fetch;
pub mod lifecycle;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use coldchain_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use cache::CacheGetParams;
pub use events::{MessageParams, NotificationClickParams, PushParams, SyncParams};
pub use fetch::FetchParams;

/// A response body as delivered to the host.
///
/// `body_base64` always carries the exact bytes; `body` is only present when
/// those bytes are valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BodyView {
    #[serde(rename = "body")]
    pub text: Option<String>,
    #[serde(rename = "body_base64")]
    pub base64: String,
    #[serde(rename = "body_bytes")]
    pub len: usize,
}

impl BodyView {
    pub fn new(body: &[u8]) -> Self {
        Self {
            text: std::str::from_utf8(body).ok().map(str::to_owned),
            base64: BASE64.encode(body),
            len: body.len(),
        }
    }

    #[cfg(test)]
    pub fn decode(&self) -> Vec<u8> {
        BASE64.decode(&self.base64).unwrap()
    }
}

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn parse_output<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
