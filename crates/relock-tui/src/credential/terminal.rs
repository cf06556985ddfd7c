//! Bridges the gate's confirmation flow to the render loop

use async_trait::async_trait;
use relock_core::{CredentialAuthenticator, CredentialVerdict, PromptSpec};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::app::events::AppEvent;

/// Credential capability that prompts through the TUI.
///
/// `confirm` posts a prompt event to the render loop and suspends until the
/// user's verdict comes back. A dropped responder resolves as `Cancelled`,
/// so tearing the loop down never wedges the gate.
pub struct TerminalCredential {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl TerminalCredential {
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl CredentialAuthenticator for TerminalCredential {
    async fn confirm(&self, prompt: &PromptSpec) -> CredentialVerdict {
        let (responder, verdict) = oneshot::channel();
        let event = AppEvent::CredentialPrompt {
            spec: prompt.clone(),
            responder,
        };

        if self.events.send(event).is_err() {
            debug!("Render loop gone, treating the confirmation as cancelled");
            return CredentialVerdict::Cancelled;
        }

        verdict.await.unwrap_or(CredentialVerdict::Cancelled)
    }

    fn method_name(&self) -> &'static str {
        "passphrase"
    }
}
