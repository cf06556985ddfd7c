//! Relock Core - Screen-lock gate state machine and capability traits
//!
//! This crate provides the re-entry gate for a protected screen: the
//! persisted lock policy, the shared authentication session, the
//! authenticator capability traits, and the state machine that decides per
//! activation whether the screen may be shown.

pub mod authenticator;
pub mod clock;
pub mod error;
pub mod gate;
pub mod policy;
pub mod prefs;
pub mod session;

pub use authenticator::{
    BiometricAuthenticator, BiometricErrorCode, BiometricVerdict, CredentialAuthenticator,
    CredentialVerdict, NoBiometric, PromptSpec,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{GateError, Result};
pub use gate::{needs_authentication, AuthMethod, GateOutcome, GateState, ScreenLockGate};
pub use policy::LockPolicy;
pub use prefs::{Preferences, PrefsStore};
pub use session::SharedAuthSession;

/// Preferences document version
pub const PREFS_VERSION: u32 = 1;

/// Default re-authentication timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Upper bound accepted for the timeout setting (24 hours)
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;
