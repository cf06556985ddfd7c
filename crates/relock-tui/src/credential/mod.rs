//! Passphrase credential backing the gate's confirmation flow
//!
//! The verifier stores an Argon2id hash of the passphrase and applies a
//! progressive lockout on repeated failures; the terminal adapter bridges
//! the gate's suspended `confirm` call to the render loop.

mod lockout;
mod passphrase;
mod terminal;

pub use lockout::LockoutPolicy;
pub use passphrase::{PassphraseVerifier, MAX_PASSPHRASE_LEN, MIN_PASSPHRASE_LEN};
pub use terminal::TerminalCredential;

use thiserror::Error;

/// Credential operation errors
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No passphrase has been enrolled")]
    NotEnrolled,

    #[error("Incorrect passphrase, {0} attempts left before lockout")]
    Incorrect(u32),

    #[error("Too many attempts, locked for {0}s")]
    LockedOut(u64),

    #[error("Passphrase must be between {0} and {1} characters")]
    InvalidLength(usize, usize),

    #[error("Hashing error: {0}")]
    Hash(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for CredentialError {
    fn from(e: std::io::Error) -> Self {
        CredentialError::Storage(e.to_string())
    }
}
