//! push, notification_click, sync and message tools.

use coldchain_core::{Notification, WindowClient};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json_result;
use crate::agent::ColdChainAgent;
use crate::host::{Directive, DirectiveHost};
use crate::notify::ClickOutcome;
use crate::pending::ExtendableEvent;

/// Parameters for the push tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushParams {
    /// Raw push message text, usually a JSON object.
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushOutput {
    pub notification: Notification,
    pub directives: Vec<Directive>,
}

/// Parameters for the notification_click tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickParams {
    /// Tag of the clicked notification.
    #[serde(default)]
    pub tag: Option<String>,

    /// URL stored with the notification.
    #[serde(default)]
    pub url: Option<String>,

    /// Application windows currently open.
    #[serde(default)]
    pub windows: Vec<WindowClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickOutput {
    pub outcome: ClickOutcome,
    pub directives: Vec<Directive>,
}

/// Parameters for the sync tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncParams {
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncOutput {
    /// Whether the tag matched and the offline queue was flushed.
    pub flushed: bool,
}

/// Parameters for the message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageParams {
    /// Message posted by a page, e.g. `{"type": "SKIP_WAITING"}`.
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageOutput {
    pub reply: Option<Value>,
    pub directives: Vec<Directive>,
}

pub async fn push_impl(agent: &ColdChainAgent, params: PushParams) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("push");
    let host = DirectiveHost::default();
    let notification = agent.push(&event, &host, params.payload.as_deref()).await?;
    event.settled().await;

    json_result(&PushOutput { notification, directives: host.into_directives() })
}

pub async fn notification_click_impl(
    agent: &ColdChainAgent, params: NotificationClickParams,
) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("notificationclick");
    let host = DirectiveHost::new(params.windows);
    let outcome = agent
        .notification_click(&event, &host, params.tag.as_deref(), params.url.as_deref())
        .await?;
    event.settled().await;

    json_result(&NotificationClickOutput { outcome, directives: host.into_directives() })
}

pub async fn sync_impl(agent: &ColdChainAgent, params: SyncParams) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("sync");
    let flushed = agent.sync(&event, &params.tag).await?;
    event.settled().await;

    json_result(&SyncOutput { flushed })
}

pub async fn message_impl(agent: &ColdChainAgent, params: MessageParams) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("message");
    let host = DirectiveHost::default();
    let reply = agent.message(&event, &host, &params.data).await?;
    event.settled().await;

    json_result(&MessageOutput { reply, directives: host.into_directives() })
}
