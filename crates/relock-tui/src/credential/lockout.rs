//! Brute-force protection through progressive lockout

use std::time::Duration;

/// Lockout policy for failed passphrase attempts
///
/// Thresholds pair a failure count with the lockout that kicks in once the
/// count is reached; higher tiers override lower ones.
#[derive(Clone, Debug)]
pub struct LockoutPolicy {
    /// Format: (min_attempts, lockout_duration)
    thresholds: Vec<(u32, Duration)>,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            thresholds: vec![
                // Attempts 1-4: no lockout
                // Attempts 5-6: 30 second lockout
                (5, Duration::from_secs(30)),
                // Attempts 7-8: 5 minute lockout
                (7, Duration::from_secs(5 * 60)),
                // Attempts 9+: 1 hour lockout
                (9, Duration::from_secs(60 * 60)),
            ],
        }
    }
}

impl LockoutPolicy {
    /// Create a custom lockout policy
    pub fn custom(thresholds: Vec<(u32, Duration)>) -> Self {
        Self { thresholds }
    }

    /// The lockout duration in force after the given number of failures
    pub fn lockout_duration(&self, failed_attempts: u32) -> Option<Duration> {
        self.thresholds
            .iter()
            .rev()
            .find(|(min, _)| failed_attempts >= *min)
            .map(|(_, duration)| *duration)
    }

    /// Failures tolerated before the first lockout tier
    pub fn max_attempts(&self) -> u32 {
        self.thresholds
            .first()
            .map(|(min, _)| min.saturating_sub(1))
            .unwrap_or(u32::MAX)
    }

    /// Whether the given failure count sits in a lockout tier
    pub fn is_locked_out(&self, failed_attempts: u32) -> bool {
        self.lockout_duration(failed_attempts).is_some()
    }
}
