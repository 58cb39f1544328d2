//! File-backed credential store.
//!
//! The [`CredentialVault`] persists a single encrypted API key as a small
//! JSON record:
//!
//! ```json
//! { "api_key": "<token>" }
//! ```
//!
//! The file lives at `<documents>/PromptOptimizer/config.json` by default and
//! is overwritten in full on every successful [`save`](CredentialVault::save).
//! Reads fail closed: a missing file, unreadable file, malformed JSON, or a
//! token that does not decrypt all collapse to "no credential stored", so
//! callers never have to distinguish corruption from absence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::error::{Result, VaultError};

/// Directory created under the user's documents folder.
pub const APP_DIR_NAME: &str = "PromptOptimizer";

/// Name of the config file inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// The on-disk record. A single field today; `serde(default)` keeps older or
/// partially written files readable.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigRecord {
    #[serde(default)]
    api_key: String,
}

/// Encrypts, persists, and recovers a single stored credential.
///
/// The encryption key is derived once from the fixed application constants
/// (see [`crypto::vault_key`]), so no key material is ever written to disk.
pub struct CredentialVault {
    /// Path of the JSON config file.
    config_path: PathBuf,
    /// Derived AES-256-GCM key.
    key: [u8; crypto::KEY_LEN],
}

impl CredentialVault {
    /// Create a vault backed by the given config file path.
    ///
    /// The file and its parent directory do not need to exist yet; they are
    /// created on the first successful [`save`](Self::save).
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            key: crypto::vault_key(),
        }
    }

    /// Create a vault at the default per-user location.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::HomeDirUnavailable`] if the home directory
    /// cannot be resolved from the environment.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Default config file location:
    /// `<home>/Documents/PromptOptimizer/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .ok_or(VaultError::HomeDirUnavailable)?;

        Ok(PathBuf::from(home)
            .join("Documents")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// The path of the backing config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Encrypt `plaintext` into an opaque, persistable token.
    ///
    /// Tokens are authenticated (tampering is detected on decrypt) and
    /// randomized (the same plaintext seals to different tokens).
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        crypto::seal_token(plaintext, &self.key)
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails closed: any error — malformed token, wrong key, tampered
    /// ciphertext — yields an empty string rather than an error. "No
    /// credential stored" and "stored credential is corrupt" are therefore
    /// indistinguishable to callers, by design.
    pub fn decrypt(&self, token: &str) -> String {
        match crypto::open_token(token, &self.key) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::debug!(error = %e, "token failed to decrypt, treating as absent");
                String::new()
            }
        }
    }

    /// Encrypt `plaintext` and overwrite the config file with it.
    ///
    /// # Errors
    ///
    /// - [`VaultError::EmptyCredential`] if `plaintext` is empty after
    ///   trimming; storage is left untouched.
    /// - [`VaultError::Io`] if the directory or file cannot be written.
    pub fn save(&self, plaintext: &str) -> Result<()> {
        if plaintext.trim().is_empty() {
            return Err(VaultError::EmptyCredential);
        }

        let token = self.encrypt(plaintext)?;
        let record = ConfigRecord { api_key: token };
        let json = serde_json::to_string_pretty(&record)?;

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, json)?;

        tracing::info!(path = %self.config_path.display(), "credential saved");
        Ok(())
    }

    /// Read and decrypt the stored credential.
    ///
    /// Returns an empty string if the file is absent, unreadable, not valid
    /// JSON, holds no token, or holds a token that fails to decrypt. Never
    /// returns an error.
    pub fn load(&self) -> String {
        let raw = match std::fs::read_to_string(&self.config_path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(
                    path = %self.config_path.display(),
                    error = %e,
                    "config file not readable, no credential"
                );
                return String::new();
            }
        };

        let record: ConfigRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "config file is not valid JSON, no credential"
                );
                return String::new();
            }
        };

        if record.api_key.is_empty() {
            return String::new();
        }

        self.decrypt(&record.api_key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
