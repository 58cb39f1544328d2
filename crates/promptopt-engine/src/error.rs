//! Engine error types.
//!
//! All engine subsystems surface errors through [`EngineError`]. Validation
//! errors are reported synchronously by [`submit`](crate::runner::JobRunner::submit)
//! before any job exists; everything that goes wrong during a remote call —
//! network, authentication, quota, malformed request, empty response —
//! collapses into the single [`EngineError::RequestFailed`] kind and is
//! delivered asynchronously through the job's `Failed` event.

use promptopt_vault::VaultError;

/// Unified error type for the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // -- Validation errors ---------------------------------------------------
    /// The credential was empty (after trimming) at submit time. No job is
    /// created and no I/O is performed.
    #[error("credential must not be empty")]
    EmptyCredential,

    /// The prompt was empty (after trimming) at submit time. No job is
    /// created and no I/O is performed.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    // -- Remote errors ---------------------------------------------------------
    /// The remote generation call failed, for any reason. The free-text
    /// `reason` is the only classification the engine attempts.
    #[error("generation request failed: {reason}")]
    RequestFailed { reason: String },

    // -- Upstream crate errors -------------------------------------------------
    /// An error propagated from the credential vault.
    #[error("vault error: {0}")]
    Vault(#[from] VaultError),
}

impl EngineError {
    /// Whether this is a submit-time validation error (as opposed to a
    /// failure of an accepted job).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyCredential | Self::EmptyPrompt)
    }
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            reason: err.to_string(),
        }
    }
}
