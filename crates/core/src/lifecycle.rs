//! Lifecycle states of one agent version.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where one version of the agent sits in its install/activate lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Registered but no install event seen yet.
    Parsed,
    Installing,
    /// Installed; waiting to become the active handler.
    Waiting,
    Activating,
    Active,
    /// Install failed; this version never serves requests.
    Redundant,
}

impl LifecycleState {
    /// Whether the lifecycle graph allows moving from `self` to `next`.
    ///
    /// `Active -> Activating` is allowed so a host may re-deliver activation;
    /// `Waiting -> Installing` covers a re-delivered install.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Parsed, Installing)
                | (Installing, Waiting)
                | (Installing, Redundant)
                | (Waiting, Installing)
                | (Waiting, Activating)
                | (Activating, Active)
                | (Active, Activating)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Parsed => "parsed",
            LifecycleState::Installing => "installing",
            LifecycleState::Waiting => "waiting",
            LifecycleState::Activating => "activating",
            LifecycleState::Active => "active",
            LifecycleState::Redundant => "redundant",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
