//! Passphrase storage and verification with secure hashing

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::{CredentialError, LockoutPolicy};

/// Minimum passphrase length
pub const MIN_PASSPHRASE_LEN: usize = 6;
/// Maximum passphrase length
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// On-disk credential record
#[derive(Serialize, Deserialize)]
struct CredentialRecord {
    /// Argon2id hash in PHC string format
    hash: String,
    /// Consecutive failed attempts
    failed_attempts: u32,
    /// Unix epoch seconds of the last failed attempt
    last_failed_at: Option<u64>,
}

/// Verifies passphrases against a stored Argon2id hash.
///
/// Failed attempts are persisted and feed a progressive lockout, so
/// restarting the host does not reset the ladder.
pub struct PassphraseVerifier {
    storage_path: PathBuf,
    record: Option<CredentialRecord>,
    lockout: LockoutPolicy,
}

impl PassphraseVerifier {
    /// Open the verifier, loading enrollment state when present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let storage_path = path.into();
        let record = if storage_path.exists() {
            let contents = fs::read_to_string(&storage_path)?;
            match serde_json::from_str(&contents) {
                Ok(record) => Some(record),
                Err(e) => {
                    // An unreadable record cannot block the host from
                    // starting; the passphrase must be enrolled again.
                    warn!(
                        "Discarding unreadable credential record at {}: {}",
                        storage_path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            storage_path,
            record,
            lockout: LockoutPolicy::default(),
        })
    }

    /// Whether a passphrase has been enrolled
    pub fn is_enrolled(&self) -> bool {
        self.record.is_some()
    }

    /// Enroll a new passphrase, replacing any existing one
    pub fn enroll(&mut self, passphrase: &str) -> Result<(), CredentialError> {
        if passphrase.len() < MIN_PASSPHRASE_LEN || passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(CredentialError::InvalidLength(
                MIN_PASSPHRASE_LEN,
                MAX_PASSPHRASE_LEN,
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let bytes = Zeroizing::new(passphrase.as_bytes().to_vec());
        let hash = Argon2::default()
            .hash_password(&bytes, &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .to_string();

        self.record = Some(CredentialRecord {
            hash,
            failed_attempts: 0,
            last_failed_at: None,
        });
        self.save()?;

        info!("Passphrase enrolled");
        Ok(())
    }

    /// Verify a passphrase attempt.
    ///
    /// A failure increments the persisted attempt counter; a success resets
    /// it. Attempts made during an active lockout are refused without
    /// touching the hash.
    pub fn verify(&mut self, passphrase: &str) -> Result<(), CredentialError> {
        if let Some(secs) = self.lockout_remaining_secs() {
            return Err(CredentialError::LockedOut(secs));
        }

        let record = self.record.as_mut().ok_or(CredentialError::NotEnrolled)?;

        let parsed =
            PasswordHash::new(&record.hash).map_err(|e| CredentialError::Hash(e.to_string()))?;
        let bytes = Zeroizing::new(passphrase.as_bytes().to_vec());
        let ok = Argon2::default().verify_password(&bytes, &parsed).is_ok();

        if ok {
            record.failed_attempts = 0;
            record.last_failed_at = None;
            self.save()?;
            Ok(())
        } else {
            record.failed_attempts += 1;
            record.last_failed_at = Some(unix_now());
            let attempts = record.failed_attempts;
            self.save()?;
            warn!("Passphrase attempt {} failed", attempts);

            match self.lockout_remaining_secs() {
                Some(secs) => Err(CredentialError::LockedOut(secs)),
                None => Err(CredentialError::Incorrect(self.attempts_remaining())),
            }
        }
    }

    /// Failures left before the next one triggers a lockout
    pub fn attempts_remaining(&self) -> u32 {
        self.lockout
            .max_attempts()
            .saturating_sub(self.failed_attempts())
    }

    /// Consecutive failed attempts on record
    pub fn failed_attempts(&self) -> u32 {
        self.record
            .as_ref()
            .map(|r| r.failed_attempts)
            .unwrap_or(0)
    }

    /// Seconds left in the active lockout, if any
    pub fn lockout_remaining_secs(&self) -> Option<u64> {
        let record = self.record.as_ref()?;
        let duration = self.lockout.lockout_duration(record.failed_attempts)?;
        let since = unix_now().saturating_sub(record.last_failed_at?);
        let total = duration.as_secs();
        (since < total).then(|| total - since)
    }

    /// Full length of the lockout tier currently in force
    pub fn lockout_total_secs(&self) -> Option<u64> {
        let record = self.record.as_ref()?;
        self.lockout
            .lockout_duration(record.failed_attempts)
            .map(|d| d.as_secs())
    }

    fn save(&self) -> Result<(), CredentialError> {
        let Some(record) = &self.record else {
            return Ok(());
        };

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| CredentialError::Storage(e.to_string()))?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically; this runs on every failed attempt, and a record
        // truncated mid-write would read as corrupt on the next launch
        let temp_path = self.storage_path.with_extension("json.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.storage_path)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.storage_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_enroll_and_verify() {
        let dir = tempdir().unwrap();
        let mut verifier = PassphraseVerifier::open(dir.path().join("credential.json")).unwrap();
        assert!(!verifier.is_enrolled());

        verifier.enroll("correct horse").unwrap();
        assert!(verifier.is_enrolled());

        assert!(verifier.verify("correct horse").is_ok());
    }

    #[test]
    fn test_length_validation() {
        let dir = tempdir().unwrap();
        let mut verifier = PassphraseVerifier::open(dir.path().join("credential.json")).unwrap();

        assert!(matches!(
            verifier.enroll("abc"),
            Err(CredentialError::InvalidLength(_, _))
        ));
        assert!(matches!(
            verifier.enroll(&"x".repeat(MAX_PASSPHRASE_LEN + 1)),
            Err(CredentialError::InvalidLength(_, _))
        ));
        assert!(!verifier.is_enrolled());
    }

    #[test]
    fn test_verify_without_enrollment() {
        let dir = tempdir().unwrap();
        let mut verifier = PassphraseVerifier::open(dir.path().join("credential.json")).unwrap();

        assert!(matches!(
            verifier.verify("whatever"),
            Err(CredentialError::NotEnrolled)
        ));
    }

    #[test]
    fn test_failures_count_down_to_lockout() {
        let dir = tempdir().unwrap();
        let mut verifier = PassphraseVerifier::open(dir.path().join("credential.json")).unwrap();
        verifier.enroll("correct horse").unwrap();

        let free = verifier.attempts_remaining();
        for expected_left in (0..free).rev() {
            match verifier.verify("wrong pony") {
                Err(CredentialError::Incorrect(left)) => assert_eq!(left, expected_left),
                other => panic!("expected an incorrect-passphrase error, got {:?}", other),
            }
        }

        // The next failure crosses into the first lockout tier
        assert!(matches!(
            verifier.verify("wrong pony"),
            Err(CredentialError::LockedOut(_))
        ));
        assert!(verifier.lockout_remaining_secs().is_some());

        // Even the right passphrase is refused while locked out
        assert!(matches!(
            verifier.verify("correct horse"),
            Err(CredentialError::LockedOut(_))
        ));
    }

    #[test]
    fn test_success_resets_the_counter() {
        let dir = tempdir().unwrap();
        let mut verifier = PassphraseVerifier::open(dir.path().join("credential.json")).unwrap();
        verifier.enroll("correct horse").unwrap();

        let _ = verifier.verify("wrong pony");
        let _ = verifier.verify("wrong pony");
        assert_eq!(verifier.failed_attempts(), 2);

        verifier.verify("correct horse").unwrap();
        assert_eq!(verifier.failed_attempts(), 0);
    }

    #[test]
    fn test_corrupt_record_degrades_to_reenrollment() {
        // A truncated or garbled record must not brick the host
        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");
        fs::write(&path, "{\"hash\": \"$argon2id$trunc").unwrap();

        let mut verifier = PassphraseVerifier::open(&path).unwrap();
        assert!(!verifier.is_enrolled());

        verifier.enroll("correct horse").unwrap();
        assert!(verifier.verify("correct horse").is_ok());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");

        let mut verifier = PassphraseVerifier::open(&path).unwrap();
        verifier.enroll("correct horse").unwrap();
        let _ = verifier.verify("wrong pony");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_attempt_counter_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");

        let mut verifier = PassphraseVerifier::open(&path).unwrap();
        verifier.enroll("correct horse").unwrap();
        let _ = verifier.verify("wrong pony");
        let _ = verifier.verify("wrong pony");
        drop(verifier);

        let reopened = PassphraseVerifier::open(&path).unwrap();
        assert!(reopened.is_enrolled());
        assert_eq!(reopened.failed_attempts(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_storage_permissions_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("credential.json");
        let mut verifier = PassphraseVerifier::open(&path).unwrap();
        verifier.enroll("correct horse").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
