//! install and activate tools.

use coldchain_core::LifecycleState;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::agent::ColdChainAgent;
use crate::host::{Directive, DirectiveHost};
use crate::lifecycle::{ActivateReport, InstallReport};
use crate::pending::ExtendableEvent;

/// Output from the install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallOutput {
    pub state: LifecycleState,
    pub report: InstallReport,
    pub directives: Vec<Directive>,
}

/// Output from the activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActivateOutput {
    pub state: LifecycleState,
    pub report: ActivateReport,
    pub directives: Vec<Directive>,
}

pub async fn install_impl(agent: &ColdChainAgent) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("install");
    let host = DirectiveHost::default();
    let report = agent.install(&event, &host).await?;
    event.settled().await;

    json_result(&InstallOutput { state: agent.state().await, report, directives: host.into_directives() })
}

pub async fn activate_impl(agent: &ColdChainAgent) -> Result<CallToolResult, McpError> {
    let event = ExtendableEvent::new("activate");
    let host = DirectiveHost::default();
    let report = agent.activate(&event, &host).await?;
    event.settled().await;

    json_result(&ActivateOutput { state: agent.state().await, report, directives: host.into_directives() })
}
