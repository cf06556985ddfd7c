//! Screen-lock gate
//!
//! Decides, per activation of the protected screen, whether the user must
//! re-authenticate, and drives the authentication flow when they must:
//! biometric when a sensor is available, falling back to an interactive
//! credential confirmation.
//!
//! # Flow
//!
//! ```text
//! Locked ──check──► Authenticating(Biometric) ──success──► Unlocked
//!    │                    │         │
//!    │                    │         └──mismatch──► Locked (retry)
//!    │                    └──error/cancel──┐
//!    └──check (no sensor)──────────────────┴──► Authenticating(Credential)
//!                                                │          │
//!                                     confirmed, fresh   cancel/stale
//!                                                │          │
//!                                            Unlocked     Locked
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::authenticator::{
    BiometricAuthenticator, BiometricVerdict, CredentialAuthenticator, CredentialVerdict,
    PromptSpec,
};
use crate::clock::Clock;
use crate::policy::LockPolicy;
use crate::prefs::PrefsStore;
use crate::session::SharedAuthSession;

/// Authentication method the gate is currently driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Biometric,
    Credential,
}

/// Gate state, observable by the host for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Re-authentication is required before the protected screen may show
    #[default]
    Locked,
    /// An authenticator prompt is in flight
    Authenticating(AuthMethod),
    /// The activation is authenticated; the host may proceed
    Unlocked,
}

/// Outcome of one access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Proceed to the protected screen
    Allow,
    /// A completed authentication was refused (confirmation went stale)
    Deny,
    /// Authentication did not complete; the user may re-trigger the check
    PendingUserAction,
}

/// Whether a check under `policy`, with the given time since the last
/// successful authentication, must prompt the user.
///
/// `elapsed = None` (nothing recorded) counts as indefinitely stale.
pub fn needs_authentication(policy: &LockPolicy, elapsed: Option<Duration>) -> bool {
    if !policy.enabled {
        return false;
    }
    match elapsed {
        Some(elapsed) => !policy.is_fresh(elapsed),
        None => true,
    }
}

/// The re-entry gate for a protected screen
///
/// Holds its collaborators for the lifetime of the host: the persisted
/// policy, the shared session record, a time source, and the two
/// authentication capabilities.
pub struct ScreenLockGate {
    prefs: Arc<PrefsStore>,
    session: SharedAuthSession,
    clock: Arc<dyn Clock>,
    biometric: Arc<dyn BiometricAuthenticator>,
    credential: Arc<dyn CredentialAuthenticator>,
    prompt: PromptSpec,
    state: GateState,
}

impl ScreenLockGate {
    pub fn new(
        prefs: Arc<PrefsStore>,
        session: SharedAuthSession,
        clock: Arc<dyn Clock>,
        biometric: Arc<dyn BiometricAuthenticator>,
        credential: Arc<dyn CredentialAuthenticator>,
    ) -> Self {
        Self {
            prefs,
            session,
            clock,
            biometric,
            credential,
            prompt: PromptSpec::default(),
            state: GateState::Locked,
        }
    }

    /// Replace the prompt presentation details
    pub fn with_prompt(mut self, prompt: PromptSpec) -> Self {
        self.prompt = prompt;
        self
    }

    /// Current state, for rendering
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the next activation would demand authentication.
    ///
    /// Same decision as the first two steps of [`check_access`], with no
    /// side effects. The host polls this to relock when the session goes
    /// stale while the protected screen is showing.
    ///
    /// [`check_access`]: Self::check_access
    pub fn requires_auth(&self) -> bool {
        let policy = self.prefs.lock_policy();
        let elapsed = self.session.elapsed(self.clock.as_ref());
        needs_authentication(&policy, elapsed)
    }

    /// Run one access check for a fresh activation of the protected screen.
    ///
    /// Reads the policy and session, and when authentication is required
    /// drives the strongest available method to completion. Returns the
    /// outcome the host acts on; the side effects are the session update on
    /// success and the observable state transitions along the way.
    pub async fn check_access(&mut self) -> GateOutcome {
        let policy = self.prefs.lock_policy();

        if !policy.enabled {
            debug!("Screen lock disabled, allowing");
            self.state = GateState::Unlocked;
            return GateOutcome::Allow;
        }

        let elapsed = self.session.elapsed(self.clock.as_ref());
        if !needs_authentication(&policy, elapsed) {
            debug!(
                "Previous authentication still valid ({}s of {}s), allowing",
                elapsed.unwrap_or_default().as_secs(),
                policy.timeout_secs
            );
            self.state = GateState::Unlocked;
            return GateOutcome::Allow;
        }

        // Stale or never authenticated: the user must prove themselves.
        self.state = GateState::Locked;

        if self.biometric.is_available() {
            self.run_biometric(policy).await
        } else {
            debug!("Biometric unavailable, confirming credential directly");
            self.run_credential(policy).await
        }
    }

    /// Drive one biometric prompt and act on its verdict
    async fn run_biometric(&mut self, policy: LockPolicy) -> GateOutcome {
        self.state = GateState::Authenticating(AuthMethod::Biometric);
        info!(
            "Starting biometric authentication via {}",
            self.biometric.method_name()
        );

        match self.biometric.authenticate(&self.prompt).await {
            BiometricVerdict::Success => {
                // Biometric results are fresh by construction; record
                // unconditionally. Only the credential path re-validates.
                self.session.record_success(self.clock.as_ref());
                self.state = GateState::Unlocked;
                info!("Biometric authentication succeeded");
                GateOutcome::Allow
            }
            BiometricVerdict::Mismatch => {
                info!("Biometric mismatch, staying locked");
                self.state = GateState::Locked;
                GateOutcome::PendingUserAction
            }
            BiometricVerdict::Error(code) => {
                warn!(
                    "Biometric error ({:?}), falling back to credential confirmation",
                    code
                );
                self.run_credential(policy).await
            }
            BiometricVerdict::Cancelled => {
                debug!("Biometric prompt dismissed, falling back to credential confirmation");
                self.run_credential(policy).await
            }
        }
    }

    /// Drive one credential confirmation and act on its verdict
    async fn run_credential(&mut self, policy: LockPolicy) -> GateOutcome {
        self.state = GateState::Authenticating(AuthMethod::Credential);
        info!(
            "Starting credential confirmation via {}",
            self.credential.method_name()
        );

        let started = self.clock.now();
        match self.credential.confirm(&self.prompt).await {
            CredentialVerdict::Confirmed => {
                // The confirmation surface may have sat open long enough for
                // the result itself to go stale; re-validate before trusting.
                let round_trip = self.clock.now().saturating_sub(started);
                if policy.accepts_confirmation(round_trip) {
                    self.session.record_success(self.clock.as_ref());
                    self.state = GateState::Unlocked;
                    info!("Credential confirmed");
                    GateOutcome::Allow
                } else {
                    warn!(
                        "Credential confirmation took {}s, past the {}s window; denying",
                        round_trip.as_secs(),
                        policy.timeout_secs
                    );
                    self.state = GateState::Locked;
                    GateOutcome::Deny
                }
            }
            CredentialVerdict::Cancelled => {
                info!("Credential confirmation cancelled, staying locked");
                self.state = GateState::Locked;
                GateOutcome::PendingUserAction
            }
        }
    }

    /// Seconds left before the current session goes stale.
    ///
    /// `None` when the lock is disabled or nothing is recorded yet.
    pub fn remaining_validity_secs(&self) -> Option<u64> {
        let policy = self.prefs.lock_policy();
        if !policy.enabled {
            return None;
        }
        self.session
            .remaining_secs(self.clock.as_ref(), policy.timeout_secs)
    }
}
