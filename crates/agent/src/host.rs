//! Host implementation for the stdio bridge.
//!
//! The bridge cannot reach into the browser, so every host action is recorded
//! as a [`Directive`] and returned with the event's result for the host to
//! carry out. The open windows are supplied by the host with the event.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use coldchain_core::{Error, Host, Notification, WindowClient};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An action the host must perform on the agent's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    SkipWaiting,
    Claim,
    ShowNotification { notification: Notification },
    CloseNotification { tag: String },
    FocusWindow { id: String },
    OpenWindow { url: String },
}

#[derive(Default)]
pub struct DirectiveHost {
    windows: Vec<WindowClient>,
    directives: Mutex<Vec<Directive>>,
}

impl DirectiveHost {
    pub fn new(windows: Vec<WindowClient>) -> Self {
        Self { windows, directives: Mutex::new(Vec::new()) }
    }

    pub fn into_directives(self) -> Vec<Directive> {
        self.directives.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, directive: Directive) {
        self.directives.lock().unwrap_or_else(PoisonError::into_inner).push(directive);
    }
}

#[async_trait]
impl Host for DirectiveHost {
    async fn skip_waiting(&self) -> Result<(), Error> {
        self.record(Directive::SkipWaiting);
        Ok(())
    }

    async fn claim(&self) -> Result<(), Error> {
        self.record(Directive::Claim);
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), Error> {
        self.record(Directive::ShowNotification { notification: notification.clone() });
        Ok(())
    }

    async fn close_notification(&self, tag: &str) -> Result<(), Error> {
        self.record(Directive::CloseNotification { tag: tag.to_string() });
        Ok(())
    }

    async fn match_all_windows(&self) -> Result<Vec<WindowClient>, Error> {
        Ok(self.windows.clone())
    }

    async fn focus_window(&self, id: &str) -> Result<(), Error> {
        if !self.windows.iter().any(|w| w.id == id) {
            return Err(Error::Host(format!("no open window with id {id}")));
        }
        self.record(Directive::FocusWindow { id: id.to_string() });
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), Error> {
        self.record(Directive::OpenWindow { url: url.to_string() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directives_recorded_in_order() {
        let host = DirectiveHost::default();
        host.skip_waiting().await.unwrap();
        host.claim().await.unwrap();

        assert_eq!(host.into_directives(), vec![Directive::SkipWaiting, Directive::Claim]);
    }

    #[tokio::test]
    async fn test_focus_unknown_window_fails() {
        let host = DirectiveHost::default();
        let result = host.focus_window("ghost").await;
        assert!(matches!(result, Err(Error::Host(_))));
        assert!(host.into_directives().is_empty());
    }

    #[test]
    fn test_directive_serialization() {
        let json = serde_json::to_value(Directive::FocusWindow { id: "w1".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "focus_window", "id": "w1"}));

        let json = serde_json::to_value(Directive::SkipWaiting).unwrap();
        assert_eq!(json, serde_json::json!({"type": "skip_waiting"}));
    }
}
