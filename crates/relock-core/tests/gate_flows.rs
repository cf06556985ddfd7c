//! End-to-end gate checks with scripted authenticators
//!
//! Each test builds a gate over a temp preference store, a manual clock,
//! and authenticators that replay a scripted verdict sequence, then walks
//! one or more access checks through it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use relock_core::{
    BiometricAuthenticator, BiometricErrorCode, BiometricVerdict, CredentialAuthenticator,
    Clock, CredentialVerdict, GateOutcome, GateState, LockPolicy, ManualClock, PrefsStore,
    PromptSpec, ScreenLockGate, SharedAuthSession,
};
use tempfile::TempDir;

// ============================================
// Scripted authenticators
// ============================================

/// Biometric backend replaying a fixed verdict sequence
struct ScriptedSensor {
    available: bool,
    verdicts: Mutex<Vec<BiometricVerdict>>,
    calls: AtomicUsize,
}

impl ScriptedSensor {
    fn new(available: bool, verdicts: Vec<BiometricVerdict>) -> Arc<Self> {
        Arc::new(Self {
            available,
            verdicts: Mutex::new(verdicts),
            calls: AtomicUsize::new(0),
        })
    }

    fn unavailable() -> Arc<Self> {
        Self::new(false, Vec::new())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BiometricAuthenticator for ScriptedSensor {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn authenticate(&self, _prompt: &PromptSpec) -> BiometricVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut verdicts = self.verdicts.lock().unwrap();
        assert!(!verdicts.is_empty(), "sensor prompted more than scripted");
        verdicts.remove(0)
    }

    fn method_name(&self) -> &'static str {
        "scripted-sensor"
    }
}

/// Credential backend returning one fixed verdict, optionally advancing the
/// clock first to simulate a confirmation surface sitting open
struct ScriptedCredential {
    verdict: CredentialVerdict,
    delay: Option<(ManualClock, Duration)>,
    calls: AtomicUsize,
}

impl ScriptedCredential {
    fn confirming() -> Arc<Self> {
        Self::with_verdict(CredentialVerdict::Confirmed)
    }

    fn cancelling() -> Arc<Self> {
        Self::with_verdict(CredentialVerdict::Cancelled)
    }

    fn with_verdict(verdict: CredentialVerdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn confirming_after(clock: ManualClock, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            verdict: CredentialVerdict::Confirmed,
            delay: Some((clock, delay)),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialAuthenticator for ScriptedCredential {
    async fn confirm(&self, _prompt: &PromptSpec) -> CredentialVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((clock, delay)) = &self.delay {
            clock.advance(*delay);
        }
        self.verdict
    }

    fn method_name(&self) -> &'static str {
        "scripted-credential"
    }
}

// ============================================
// Fixture
// ============================================

struct Fixture {
    _dir: TempDir,
    prefs: Arc<PrefsStore>,
    session: SharedAuthSession,
    clock: ManualClock,
}

impl Fixture {
    fn new(policy: LockPolicy) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Arc::new(PrefsStore::open(dir.path().join("prefs.json")).unwrap());
        prefs.set_lock_policy(policy).unwrap();
        Self {
            _dir: dir,
            prefs,
            session: SharedAuthSession::new(),
            clock: ManualClock::new(),
        }
    }

    /// Record an authentication `ago` before the clock's current reading
    fn authenticated_ago(self, ago: Duration) -> Self {
        self.session.record_success(&self.clock);
        self.clock.advance(ago);
        self
    }

    fn gate(
        &self,
        biometric: Arc<dyn BiometricAuthenticator>,
        credential: Arc<dyn CredentialAuthenticator>,
    ) -> ScreenLockGate {
        ScreenLockGate::new(
            self.prefs.clone(),
            self.session.clone(),
            Arc::new(self.clock.clone()),
            biometric,
            credential,
        )
    }
}

// ============================================
// Immediate-allow paths
// ============================================

#[tokio::test]
async fn disabled_lock_allows_without_prompting() {
    let fx = Fixture::new(LockPolicy::disabled());
    let sensor = ScriptedSensor::new(true, Vec::new());
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(gate.state(), GateState::Unlocked);
    assert_eq!(sensor.calls(), 0);
    assert_eq!(credential.calls(), 0);
}

#[tokio::test]
async fn disabled_lock_ignores_stale_session() {
    // Even an ancient session is irrelevant once the lock is off.
    let fx =
        Fixture::new(LockPolicy::disabled()).authenticated_ago(Duration::from_secs(1_000_000));
    let sensor = ScriptedSensor::new(true, Vec::new());
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(sensor.calls(), 0);
    assert_eq!(credential.calls(), 0);
}

#[tokio::test]
async fn fresh_session_allows_without_prompting() {
    // timeout 30s, authenticated 10s ago
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(10));
    let sensor = ScriptedSensor::new(true, Vec::new());
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    let before = fx.session.last_success();
    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(gate.state(), GateState::Unlocked);
    assert_eq!(sensor.calls(), 0);
    assert_eq!(credential.calls(), 0);

    // An immediate allow is not a fresh authentication.
    assert_eq!(fx.session.last_success(), before);
}

// ============================================
// Biometric path
// ============================================

#[tokio::test]
async fn stale_session_with_sensor_runs_biometric() {
    // timeout 30s, authenticated 60s ago, user succeeds
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Success]);
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(gate.state(), GateState::Unlocked);
    assert_eq!(sensor.calls(), 1);
    assert_eq!(credential.calls(), 0);

    // Timestamp moved up to the clock's current reading.
    assert_eq!(fx.session.last_success(), Some(fx.clock.now()));
}

#[tokio::test]
async fn never_authenticated_must_authenticate() {
    let fx = Fixture::new(LockPolicy::with_timeout(30));
    let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Success]);
    let mut gate = fx.gate(sensor.clone(), ScriptedCredential::confirming());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(sensor.calls(), 1);
}

#[tokio::test]
async fn biometric_mismatch_keeps_gate_locked() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let before = fx.session.last_success();

    let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Mismatch]);
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::PendingUserAction);
    assert_eq!(gate.state(), GateState::Locked);
    assert_eq!(fx.session.last_success(), before);

    // Mismatch never falls back; the user retries the same path.
    assert_eq!(credential.calls(), 0);
}

#[tokio::test]
async fn biometric_mismatch_then_retry_succeeds() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let sensor = ScriptedSensor::new(
        true,
        vec![BiometricVerdict::Mismatch, BiometricVerdict::Success],
    );
    let mut gate = fx.gate(sensor.clone(), ScriptedCredential::confirming());

    assert_eq!(gate.check_access().await, GateOutcome::PendingUserAction);
    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(gate.state(), GateState::Unlocked);
    assert_eq!(sensor.calls(), 2);
}

#[tokio::test]
async fn every_biometric_error_code_falls_back_to_credential() {
    for code in [
        BiometricErrorCode::Lockout,
        BiometricErrorCode::HardwareUnavailable,
        BiometricErrorCode::Timeout,
        BiometricErrorCode::Other,
    ] {
        let fx =
            Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
        let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Error(code)]);
        let credential = ScriptedCredential::confirming();
        let mut gate = fx.gate(sensor.clone(), credential.clone());

        assert_eq!(
            gate.check_access().await,
            GateOutcome::Allow,
            "error code {:?} should reach the credential fallback",
            code
        );
        assert_eq!(gate.state(), GateState::Unlocked);
        assert_eq!(credential.calls(), 1);
    }
}

#[tokio::test]
async fn cancelled_biometric_falls_back_to_credential() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Cancelled]);
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor, credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(credential.calls(), 1);
}

// ============================================
// Credential path
// ============================================

#[tokio::test]
async fn unavailable_sensor_goes_straight_to_credential() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let sensor = ScriptedSensor::unavailable();
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(sensor.clone(), credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(sensor.calls(), 0);
    assert_eq!(credential.calls(), 1);
    assert_eq!(fx.session.last_success(), Some(fx.clock.now()));
}

#[tokio::test]
async fn cancelled_credential_stays_locked_without_retry() {
    // timeout 30s, authenticated 60s ago, user cancels the fallback
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let before = fx.session.last_success();

    let sensor = ScriptedSensor::unavailable();
    let credential = ScriptedCredential::cancelling();
    let mut gate = fx.gate(sensor, credential.clone());

    assert_eq!(gate.check_access().await, GateOutcome::PendingUserAction);
    assert_eq!(gate.state(), GateState::Locked);
    assert_eq!(fx.session.last_success(), before);

    // One launch only; nothing re-prompts until the user re-triggers.
    assert_eq!(credential.calls(), 1);
}

#[tokio::test]
async fn prompt_confirmation_within_window_allows() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let credential = ScriptedCredential::confirming_after(fx.clock.clone(), Duration::from_secs(5));
    let mut gate = fx.gate(ScriptedSensor::unavailable(), credential);

    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(gate.state(), GateState::Unlocked);
    assert_eq!(fx.session.last_success(), Some(fx.clock.now()));
}

#[tokio::test]
async fn stale_confirmation_is_denied() {
    // The confirmation sat open for 45s against a 30s window: the OS says
    // yes, the policy says no.
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(60));
    let before = fx.session.last_success();

    let credential =
        ScriptedCredential::confirming_after(fx.clock.clone(), Duration::from_secs(45));
    let mut gate = fx.gate(ScriptedSensor::unavailable(), credential);

    assert_eq!(gate.check_access().await, GateOutcome::Deny);
    assert_eq!(gate.state(), GateState::Locked);
    assert_eq!(fx.session.last_success(), before);
}

#[tokio::test]
async fn zero_timeout_reauths_every_activation() {
    let fx = Fixture::new(LockPolicy::always());
    let credential = ScriptedCredential::confirming();
    let mut gate = fx.gate(ScriptedSensor::unavailable(), credential.clone());

    // First activation prompts and the immediate confirmation is accepted.
    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(credential.calls(), 1);

    // The success it just recorded buys nothing: the next activation
    // prompts again.
    assert_eq!(gate.check_access().await, GateOutcome::Allow);
    assert_eq!(credential.calls(), 2);
}

// ============================================
// Host-facing surface
// ============================================

#[tokio::test]
async fn requires_auth_tracks_session_staleness() {
    let fx = Fixture::new(LockPolicy::with_timeout(30));
    let sensor = ScriptedSensor::new(true, vec![BiometricVerdict::Success]);
    let mut gate = fx.gate(sensor, ScriptedCredential::confirming());

    assert!(gate.requires_auth());

    gate.check_access().await;
    assert!(!gate.requires_auth());

    fx.clock.advance(Duration::from_secs(31));
    assert!(gate.requires_auth());
}

#[tokio::test]
async fn remaining_validity_counts_down() {
    let fx = Fixture::new(LockPolicy::with_timeout(30)).authenticated_ago(Duration::from_secs(10));
    let gate = fx.gate(ScriptedSensor::unavailable(), ScriptedCredential::confirming());

    assert_eq!(gate.remaining_validity_secs(), Some(20));

    fx.clock.advance(Duration::from_secs(25));
    assert_eq!(gate.remaining_validity_secs(), Some(0));
}

#[tokio::test]
async fn explicit_clear_forces_reauth() {
    let fx = Fixture::new(LockPolicy::with_timeout(300)).authenticated_ago(Duration::from_secs(1));
    let gate = fx.gate(ScriptedSensor::unavailable(), ScriptedCredential::confirming());

    assert!(!gate.requires_auth());
    fx.session.clear();
    assert!(gate.requires_auth());
}
