//! Simulated biometric sensor
//!
//! Stands in for fingerprint hardware: readings are requested through the
//! render loop, where keys decide the verdict. Enabled with `--sensor`.

use async_trait::async_trait;
use relock_core::{BiometricAuthenticator, BiometricVerdict, PromptSpec};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::app::events::AppEvent;

/// Always-available sensor that asks the user for its reading
pub struct KeySensor {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl KeySensor {
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl BiometricAuthenticator for KeySensor {
    fn is_available(&self) -> bool {
        true
    }

    async fn authenticate(&self, prompt: &PromptSpec) -> BiometricVerdict {
        let (responder, verdict) = oneshot::channel();
        let event = AppEvent::SensorPrompt {
            spec: prompt.clone(),
            responder,
        };

        if self.events.send(event).is_err() {
            debug!("Render loop gone, treating the reading as cancelled");
            return BiometricVerdict::Cancelled;
        }

        verdict.await.unwrap_or(BiometricVerdict::Cancelled)
    }

    fn method_name(&self) -> &'static str {
        "simulated sensor"
    }
}
