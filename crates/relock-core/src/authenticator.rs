//! Authenticator capabilities
//!
//! The gate talks to authentication backends through two traits: a biometric
//! capability with an availability probe, and a credential capability that
//! suspends until the host delivers a confirmation result. Outcomes are
//! plain verdict values, not errors: a mismatch or a cancellation is an
//! expected protocol result.

use async_trait::async_trait;

/// Presentation details for an authentication prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    /// Prompt title shown to the user
    pub title: String,

    /// Optional explanatory line
    pub subtitle: Option<String>,
}

impl PromptSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

impl Default for PromptSpec {
    fn default() -> Self {
        Self::new("Verify it's you")
    }
}

/// Why a biometric prompt could not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricErrorCode {
    /// Too many failed recognitions; the sensor is temporarily disabled
    Lockout,
    /// Sensor missing or unresponsive
    HardwareUnavailable,
    /// The prompt timed out waiting for the user
    Timeout,
    /// Any other backend-reported failure
    Other,
}

/// Outcome of one biometric prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricVerdict {
    /// Recognition succeeded
    Success,
    /// The presented biometric was not recognized; the user may retry
    Mismatch,
    /// The prompt could not complete
    Error(BiometricErrorCode),
    /// The user dismissed the prompt
    Cancelled,
}

/// Outcome of one credential confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialVerdict {
    /// The user proved knowledge of the credential
    Confirmed,
    /// The user backed out, or the confirmation surface went away
    Cancelled,
}

/// Biometric authentication capability
///
/// Implementations run one prompt to completion per call. The availability
/// probe is consulted once per gate check; callers fall back to the
/// credential path when it reports false, never treat it as an error.
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    /// Whether this backend can prompt right now
    fn is_available(&self) -> bool;

    /// Run one biometric prompt to completion
    async fn authenticate(&self, prompt: &PromptSpec) -> BiometricVerdict;

    /// Short backend name for logs
    fn method_name(&self) -> &'static str;
}

/// Credential confirmation capability
///
/// `confirm` suspends until the host delivers the user's decision; dropping
/// the confirmation surface resolves as `Cancelled`.
#[async_trait]
pub trait CredentialAuthenticator: Send + Sync {
    /// Launch the confirmation flow and wait for its verdict
    async fn confirm(&self, prompt: &PromptSpec) -> CredentialVerdict;

    /// Short backend name for logs
    fn method_name(&self) -> &'static str;
}

/// Biometric capability for hosts without a sensor
///
/// Never available, so the gate goes straight to the credential path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometric;

#[async_trait]
impl BiometricAuthenticator for NoBiometric {
    fn is_available(&self) -> bool {
        false
    }

    async fn authenticate(&self, _prompt: &PromptSpec) -> BiometricVerdict {
        BiometricVerdict::Error(BiometricErrorCode::HardwareUnavailable)
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
