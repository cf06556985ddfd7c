//! Persisted preferences
//!
//! The lock policy lives in a small JSON document under the platform data
//! directory. The gate reads it through [`PrefsStore`]; the host's settings
//! surface writes it. Writes are atomic (temp file + rename) and the file is
//! created with owner-only permissions on Unix.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GateError, Result};
use crate::policy::LockPolicy;
use crate::PREFS_VERSION;

/// On-disk preferences document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Lock policy for the protected screen
    pub lock_policy: LockPolicy,

    /// Version for future migrations
    pub version: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            lock_policy: LockPolicy::default(),
            version: PREFS_VERSION,
        }
    }
}

/// Handle to the persisted preferences
///
/// The current document is cached in memory; policy reads never touch the
/// filesystem.
pub struct PrefsStore {
    path: PathBuf,
    current: Mutex<Preferences>,
}

impl PrefsStore {
    /// Open the store, creating the document with defaults when absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let prefs = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let prefs: Preferences = serde_json::from_str(&contents).map_err(|e| {
                GateError::Storage(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            debug!("Loaded preferences from {}", path.display());
            prefs
        } else {
            let prefs = Preferences::default();
            Self::save(&path, &prefs)?;
            debug!("Created default preferences at {}", path.display());
            prefs
        };

        Ok(Self {
            path,
            current: Mutex::new(prefs),
        })
    }

    /// Current lock policy
    pub fn lock_policy(&self) -> LockPolicy {
        self.lock().lock_policy
    }

    /// Replace the lock policy and persist the document
    ///
    /// Out-of-range timeouts are clamped rather than rejected.
    pub fn set_lock_policy(&self, policy: LockPolicy) -> Result<()> {
        let clamped = policy.clamped();
        if clamped.timeout_secs != policy.timeout_secs {
            warn!(
                "Lock timeout {}s clamped to {}s",
                policy.timeout_secs, clamped.timeout_secs
            );
        }

        let mut current = self.lock();
        current.lock_policy = clamped;
        Self::save(&self.path, &current)
    }

    /// Path the store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Writers replace the whole document under the lock, so a poisoned lock
    // cannot expose partial state.
    fn lock(&self) -> std::sync::MutexGuard<'_, Preferences> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(path: &Path, prefs: &Preferences) -> Result<()> {
        let contents = serde_json::to_string_pretty(prefs)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, path)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
