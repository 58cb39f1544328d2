//! Vault error types.
//!
//! All vault subsystems surface errors through [`VaultError`], which is the
//! single error type returned by every fallible public API in this crate.
//! Note that [`decrypt`](crate::store::CredentialVault::decrypt) and
//! [`load`](crate::store::CredentialVault::load) are deliberately infallible:
//! they fail closed to an empty string instead of returning an error.

/// Unified error type for the promptopt credential vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    // -- Validation errors --------------------------------------------------
    /// An empty credential was passed to `save`; storage is left untouched.
    #[error("credential must not be empty")]
    EmptyCredential,

    // -- Crypto errors ------------------------------------------------------
    /// Encryption failed (e.g. ring internal error, nonce generation).
    #[error("encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    /// Decryption failed (e.g. malformed token, wrong key, tampered data).
    ///
    /// This variant never crosses the vault boundary — the store normalizes
    /// it to an empty string — but the crypto layer reports it so tests and
    /// internal callers can distinguish failure causes.
    #[error("decryption failed: {reason}")]
    DecryptionFailed { reason: String },

    // -- Environment errors -------------------------------------------------
    /// The user home directory could not be determined, so the default
    /// config path cannot be constructed.
    #[error("could not determine the user home directory")]
    HomeDirUnavailable,

    // -- Underlying errors --------------------------------------------------
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem (config file read/write).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;
