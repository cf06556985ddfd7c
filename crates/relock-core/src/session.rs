//! Process-wide authentication session
//!
//! Records when the user last authenticated successfully so the record
//! survives navigation between screens. The gate reads and writes it through
//! a cloneable handle injected at construction.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::clock::Clock;

#[derive(Debug, Default)]
struct AuthSession {
    /// Clock reading at the last successful authentication
    last_success: Option<Duration>,
}

/// Cloneable handle to the shared session record
#[derive(Debug, Clone, Default)]
pub struct SharedAuthSession {
    inner: Arc<Mutex<AuthSession>>,
}

impl SharedAuthSession {
    /// Fresh session with no authentication recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful authentication at the clock's current reading
    pub fn record_success(&self, clock: &dyn Clock) {
        self.lock().last_success = Some(clock.now());
    }

    /// Time since the last successful authentication.
    ///
    /// `None` means no authentication has been recorded; callers treat that
    /// as indefinitely stale.
    pub fn elapsed(&self, clock: &dyn Clock) -> Option<Duration> {
        self.lock()
            .last_success
            .map(|at| clock.now().saturating_sub(at))
    }

    /// Clock reading recorded at the last success
    pub fn last_success(&self) -> Option<Duration> {
        self.lock().last_success
    }

    /// Drop the record, forcing the next gate check to re-authenticate
    pub fn clear(&self) {
        self.lock().last_success = None;
    }

    /// Seconds left before the record goes stale under the given window.
    ///
    /// `None` when nothing is recorded; zero when already stale.
    pub fn remaining_secs(&self, clock: &dyn Clock, timeout_secs: u64) -> Option<u64> {
        self.elapsed(clock)
            .map(|elapsed| timeout_secs.saturating_sub(elapsed.as_secs()))
    }

    // The only writes are single-field stores, so a poisoned lock cannot
    // expose partial state.
    fn lock(&self) -> std::sync::MutexGuard<'_, AuthSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_new_session_has_no_record() {
        let session = SharedAuthSession::new();
        let clock = ManualClock::new();

        assert_eq!(session.elapsed(&clock), None);
        assert_eq!(session.remaining_secs(&clock, 30), None);
    }

    #[test]
    fn test_elapsed_tracks_clock() {
        let session = SharedAuthSession::new();
        let clock = ManualClock::new();

        session.record_success(&clock);
        assert_eq!(session.elapsed(&clock), Some(Duration::ZERO));

        clock.advance(Duration::from_secs(42));
        assert_eq!(session.elapsed(&clock), Some(Duration::from_secs(42)));
    }

    #[test]
    fn test_clones_share_the_record() {
        let session = SharedAuthSession::new();
        let handle = session.clone();
        let clock = ManualClock::new();

        handle.record_success(&clock);
        assert!(session.elapsed(&clock).is_some());

        session.clear();
        assert_eq!(handle.elapsed(&clock), None);
    }

    #[test]
    fn test_remaining_counts_down_to_zero() {
        let session = SharedAuthSession::new();
        let clock = ManualClock::new();
        session.record_success(&clock);

        assert_eq!(session.remaining_secs(&clock, 30), Some(30));

        clock.advance(Duration::from_secs(12));
        assert_eq!(session.remaining_secs(&clock, 30), Some(18));

        clock.advance(Duration::from_secs(60));
        assert_eq!(session.remaining_secs(&clock, 30), Some(0));
    }
}
