//! fetch tool implementation.
//!
//! Routes one intercepted request through the agent.

use std::collections::BTreeMap;

use coldchain_client::resolve;
use coldchain_core::{AgentRequest, Error, LiveResponse, RequestMode, ResponseSource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{BodyView, json_result};
use crate::agent::{ColdChainAgent, FetchOutcome};
use crate::pending::ExtendableEvent;

/// Input parameters for the fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Request URL, absolute or relative to the application origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request mode; "navigate" marks a top-level page load.
    #[serde(default)]
    pub mode: RequestMode,

    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".into()
}

/// How the host should complete the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Perform the request without the agent.
    Passthrough,
    /// Use the response below.
    Respond,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResponseView {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub source: ResponseSource,
    #[serde(flatten)]
    pub body: BodyView,
}

impl From<LiveResponse> for ResponseView {
    fn from(response: LiveResponse) -> Self {
        let status = response.status;
        let headers = response.headers.clone();
        let source = response.source;
        let body = BodyView::new(&response.into_body());
        Self { status, headers, source, body }
    }
}

/// Output structure for the fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchOutput {
    pub disposition: Disposition,
    pub response: Option<ResponseView>,
}

/// Implementation of the fetch tool.
pub async fn fetch_impl(agent: &ColdChainAgent, params: FetchParams) -> Result<CallToolResult, McpError> {
    let url = resolve(agent.origin(), &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let request = AgentRequest {
        method: params.method,
        url,
        mode: params.mode,
        headers: params.headers.into_iter().collect(),
    };

    let event = ExtendableEvent::new("fetch");
    let outcome = agent.fetch(&event, &request).await;
    event.settled().await;

    let output = match outcome? {
        FetchOutcome::Passthrough => FetchOutput { disposition: Disposition::Passthrough, response: None },
        FetchOutcome::Respond(response) => {
            FetchOutput { disposition: Disposition::Respond, response: Some(response.into()) }
        }
    };

    json_result(&output)
}
