//! Lock policy for the protected screen

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};

/// User-configured rule for whether and when re-authentication is required.
///
/// Owned by the preferences store; the gate only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPolicy {
    /// Whether the protected screen requires authentication at all
    pub enabled: bool,

    /// Seconds a successful authentication stays valid. Zero means every
    /// activation re-authenticates.
    pub timeout_secs: u64,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LockPolicy {
    /// Policy with the lock switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Policy with a custom validity window
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            enabled: true,
            timeout_secs,
        }
    }

    /// Strictest policy: re-authenticate on every activation
    pub fn always() -> Self {
        Self::with_timeout(0)
    }

    /// Clamp the timeout into the accepted range
    pub fn clamped(self) -> Self {
        Self {
            timeout_secs: self.timeout_secs.min(MAX_TIMEOUT_SECS),
            ..self
        }
    }

    /// Whether an authentication performed `elapsed` ago is still valid.
    ///
    /// A zero window is never fresh, so every activation prompts.
    pub fn is_fresh(&self, elapsed: Duration) -> bool {
        elapsed < Duration::from_secs(self.timeout_secs)
    }

    /// Whether a credential confirmation that took `round_trip` to come back
    /// is still acceptable.
    ///
    /// A confirmation that sat open longer than the validity window is
    /// already stale by the policy's own measure and must be refused. A zero
    /// window accepts the confirmation for the activation that requested it.
    pub fn accepts_confirmation(&self, round_trip: Duration) -> bool {
        self.timeout_secs == 0 || round_trip < Duration::from_secs(self.timeout_secs)
    }

    /// The validity window as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = LockPolicy::default();
        assert!(policy.enabled);
        assert_eq!(policy.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_freshness_window() {
        let policy = LockPolicy::with_timeout(30);

        assert!(policy.is_fresh(Duration::from_secs(0)));
        assert!(policy.is_fresh(Duration::from_secs(29)));
        assert!(!policy.is_fresh(Duration::from_secs(30)));
        assert!(!policy.is_fresh(Duration::from_secs(31)));
    }

    #[test]
    fn test_zero_timeout_is_never_fresh() {
        let policy = LockPolicy::always();
        assert!(!policy.is_fresh(Duration::ZERO));
        assert!(!policy.is_fresh(Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_timeout_accepts_immediate_confirmation() {
        let policy = LockPolicy::always();
        assert!(policy.accepts_confirmation(Duration::ZERO));
        assert!(policy.accepts_confirmation(Duration::from_secs(3600)));
    }

    #[test]
    fn test_confirmation_staleness() {
        let policy = LockPolicy::with_timeout(30);

        assert!(policy.accepts_confirmation(Duration::from_secs(5)));
        assert!(policy.accepts_confirmation(Duration::from_secs(29)));
        assert!(!policy.accepts_confirmation(Duration::from_secs(30)));
        assert!(!policy.accepts_confirmation(Duration::from_secs(120)));
    }

    #[test]
    fn test_clamping() {
        let policy = LockPolicy::with_timeout(MAX_TIMEOUT_SECS + 1).clamped();
        assert_eq!(policy.timeout_secs, MAX_TIMEOUT_SECS);

        let unchanged = LockPolicy::with_timeout(45).clamped();
        assert_eq!(unchanged.timeout_secs, 45);
    }
}
