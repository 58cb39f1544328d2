//! Encrypted credential vault for promptopt.
//!
//! This crate stores a single text-generation API key encrypted at rest in a
//! per-user JSON config file. The encryption key is derived deterministically
//! from fixed application constants (PBKDF2-HMAC-SHA256), so the vault needs
//! no key storage and no user passphrase — the stored token is obfuscation
//! against casual inspection of the file, not protection against an
//! adversary with access to the running system.
//!
//! # Modules
//!
//! - [`crypto`] — PBKDF2 key derivation, AES-256-GCM token sealing.
//! - [`store`] — the file-backed [`CredentialVault`].
//! - [`error`] — unified error types.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use promptopt_vault::CredentialVault;
//!
//! # fn example() -> promptopt_vault::Result<()> {
//! let vault = CredentialVault::open_default()?;
//! vault.save("AIza-example-key")?;
//!
//! // Later, possibly in another process:
//! let key = vault.load(); // "" if nothing (readable) is stored
//! assert_eq!(key, "AIza-example-key");
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
pub mod store;

// Re-export the most commonly used types at the crate root for convenience.
pub use error::{Result, VaultError};
pub use store::CredentialVault;
