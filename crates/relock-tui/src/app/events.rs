//! Events bridging the gate worker and its prompts to the host loop

use relock_core::{BiometricVerdict, CredentialVerdict, GateOutcome, PromptSpec, ScreenLockGate};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Commands accepted by the gate worker
#[derive(Debug, Clone, Copy)]
pub enum GateCommand {
    /// Run one access check for a fresh activation
    CheckAccess,
}

/// Events delivered to the host loop
pub enum AppEvent {
    /// A gate check finished
    GateFinished(GateOutcome),

    /// The sensor wants a reading from the user
    SensorPrompt {
        spec: PromptSpec,
        responder: oneshot::Sender<BiometricVerdict>,
    },

    /// The credential surface wants a passphrase
    CredentialPrompt {
        spec: PromptSpec,
        responder: oneshot::Sender<CredentialVerdict>,
    },
}

/// Drive the gate from a dedicated task.
///
/// `check_access` suspends while its authenticators wait on the user, and
/// the user answers through the same loop that renders the prompts, so the
/// gate cannot run on that loop. Commands arrive through a channel and
/// outcomes return as events. One check runs at a time.
pub async fn gate_worker(
    mut gate: ScreenLockGate,
    mut commands: mpsc::UnboundedReceiver<GateCommand>,
    events: mpsc::UnboundedSender<AppEvent>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            GateCommand::CheckAccess => {
                let outcome = gate.check_access().await;
                if events.send(AppEvent::GateFinished(outcome)).is_err() {
                    break;
                }
            }
        }
    }
    debug!("Gate worker stopped");
}
