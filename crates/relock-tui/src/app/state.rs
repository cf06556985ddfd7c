//! Host-side application state

use relock_core::{BiometricVerdict, CredentialVerdict, PromptSpec};
use tokio::sync::oneshot;

/// Current screen/view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// First-run passphrase enrollment
    Setup,

    /// Gate is closed; idle or showing an authenticator prompt
    #[default]
    Locked,

    /// The protected screen
    Home,

    /// Lock policy editing, reached from Home
    Settings,
}

/// Which half of enrollment the user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupStep {
    /// Choosing the passphrase
    #[default]
    Enter,

    /// Typing it a second time
    Confirm,
}

/// A sensor prompt waiting for the user's reading
pub struct SensorPrompt {
    /// Presentation details from the gate
    pub spec: PromptSpec,

    /// Resolves the suspended biometric flow
    pub responder: oneshot::Sender<BiometricVerdict>,
}

/// A credential prompt waiting for a passphrase
pub struct CredentialPrompt {
    /// Presentation details from the gate
    pub spec: PromptSpec,

    /// Resolves the suspended confirmation flow
    pub responder: oneshot::Sender<CredentialVerdict>,

    /// Passphrase input buffer
    pub input: String,
}

/// Application state
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Enrollment step
    pub setup_step: SetupStep,

    /// Enrollment input buffer
    pub setup_input: String,

    /// Enrollment confirmation buffer
    pub setup_confirm: String,

    /// Sensor prompt in flight, if any
    pub sensor_prompt: Option<SensorPrompt>,

    /// Credential prompt in flight, if any
    pub credential_prompt: Option<CredentialPrompt>,

    /// Whether a gate check is running
    pub check_in_flight: bool,

    /// Settings list selection index
    pub settings_index: usize,

    /// Status message to display
    pub status_message: Option<String>,

    /// Error message to display
    pub error_message: Option<String>,

    /// Tick counter for animations
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create new application state
    pub fn new() -> Self {
        Self {
            screen: Screen::Locked,
            setup_step: SetupStep::Enter,
            setup_input: String::new(),
            setup_confirm: String::new(),
            sensor_prompt: None,
            credential_prompt: None,
            check_in_flight: false,
            settings_index: 0,
            status_message: None,
            error_message: None,
            tick: 0,
        }
    }

    /// Clear transient messages
    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }

    /// Set a status message, clearing any error
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.error_message = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}
