//! MCP server handler implementation.
//!
//! Every agent event arrives as a tool call; this module routes each call to
//! its implementation in [`crate::tools`].
use std::sync::Arc;

use crate::agent::ColdChainAgent;
use crate::tools::{
    CacheGetParams, FetchParams, MessageParams, NotificationClickParams, PushParams, SyncParams, cache, events,
    fetch::fetch_impl,
    lifecycle::{activate_impl, install_impl},
};
use coldchain_core::CacheDb;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for coldchain-agent.
#[derive(Clone)]
pub struct ColdChainServer {
    agent: Arc<ColdChainAgent>,
    cache: CacheDb,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl ColdChainServer {
    /// Create a new server handler.
    ///
    /// `cache` must be the database backing the agent's cache storage so
    /// the inspection tools see what the agent writes.
    pub fn new(agent: Arc<ColdChainAgent>, cache: CacheDb) -> Self {
        Self { agent, cache, tool_router: Self::tool_router() }
    }

    #[tool(description = "Deliver the install event. Precaches the application shell and requests skip-waiting.")]
    async fn install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.agent).await
    }

    #[tool(description = "Deliver the activate event. Deletes stale cache stores and requests client claim.")]
    async fn activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.agent).await
    }

    /// Route an intercepted request.
    ///
    /// Font hosts are served cache-first, same-origin GETs network-first with
    /// an offline fallback; everything else passes through to the network.
    #[tool(
        description = "Deliver a fetch event. Returns passthrough, or the response the agent produced (network, cache or synthetic offline)."
    )]
    async fn fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.agent, params.0).await
    }

    #[tool(description = "Deliver a push message. Returns the notification to display.")]
    async fn push(&self, params: Parameters<PushParams>) -> Result<CallToolResult, McpError> {
        events::push_impl(&self.agent, params.0).await
    }

    #[tool(description = "Deliver a notification click. Focuses an open application window or opens a new one.")]
    async fn notification_click(&self, params: Parameters<NotificationClickParams>) -> Result<CallToolResult, McpError> {
        events::notification_click_impl(&self.agent, params.0).await
    }

    #[tool(description = "Deliver a background sync event. Flushes the offline queue when the tag matches.")]
    async fn sync(&self, params: Parameters<SyncParams>) -> Result<CallToolResult, McpError> {
        events::sync_impl(&self.agent, params.0).await
    }

    #[tool(description = "Deliver a page message such as {\"type\": \"SKIP_WAITING\"} or {\"type\": \"GET_VERSION\"}.")]
    async fn message(&self, params: Parameters<MessageParams>) -> Result<CallToolResult, McpError> {
        events::message_impl(&self.agent, params.0).await
    }

    #[tool(description = "List cache stores with entry counts and whether the next activation keeps them.")]
    async fn cache_list(&self) -> Result<CallToolResult, McpError> {
        cache::list_impl(&self.cache, self.agent.config()).await
    }

    #[tool(description = "Get the stored snapshot for a request from a cache store.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        cache::get_impl(&self.cache, self.agent.config(), self.agent.origin(), params.0).await
    }
}

impl ServerHandler for ColdChainServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "coldchain-agent".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
