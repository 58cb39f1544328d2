//! Orchestration facade.
//!
//! The [`Orchestrator`] is the single component the presentation layer talks
//! to. It wires UI intents to the credential vault and the job runner:
//! "save" goes to [`CredentialVault::save`], "submit" goes to
//! [`JobRunner::submit`], and the job's terminal event is handed back for
//! the presentation layer to render.
//!
//! It also tracks a [`DisplayState`] for the presentation layer's benefit.
//! That state is a convenience, not an invariant: nothing prevents a second
//! submission while a job is in flight — each submission gets its own
//! independent handle, and whichever terminal event the caller awaits is
//! delivered regardless of ordering.

use promptopt_vault::CredentialVault;

use crate::error::Result;
use crate::job::{JobEvent, JobOutcome};
use crate::runner::{JobHandle, JobRunner};

/// What the presentation layer is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Nothing submitted yet (or between interactions).
    #[default]
    Idle,
    /// A job is in flight.
    AwaitingResult,
    /// The last job completed and its result is on display.
    ResultShown,
    /// The last job failed and its error is on display.
    ErrorShown,
}

/// Wires UI intents to the vault and the runner.
pub struct Orchestrator {
    vault: CredentialVault,
    runner: JobRunner,
    display: DisplayState,
}

impl Orchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(vault: CredentialVault, runner: JobRunner) -> Self {
        Self {
            vault,
            runner,
            display: DisplayState::default(),
        }
    }

    /// What the presentation layer should currently be showing.
    pub fn display_state(&self) -> DisplayState {
        self.display
    }

    /// Encrypt and persist a credential.
    ///
    /// # Errors
    ///
    /// Propagates the vault's validation and persistence errors; the stored
    /// state is unchanged on failure.
    pub fn save_credential(&self, credential: &str) -> Result<()> {
        self.vault.save(credential.trim())?;
        Ok(())
    }

    /// The stored credential, or `""` when nothing (readable) is stored.
    pub fn stored_credential(&self) -> String {
        self.vault.load()
    }

    /// Path of the vault's backing config file (for status reporting).
    pub fn config_path(&self) -> &std::path::Path {
        self.vault.config_path()
    }

    /// Submit a prompt for improvement.
    ///
    /// Validation errors are returned synchronously and leave the display
    /// state untouched; on acceptance the display moves to
    /// [`DisplayState::AwaitingResult`].
    pub fn submit(&mut self, credential: &str, prompt: &str) -> Result<JobHandle> {
        let handle = self.runner.submit(credential, prompt)?;
        self.display = DisplayState::AwaitingResult;
        Ok(handle)
    }

    /// Await a job's terminal event and update the display state to match.
    pub async fn wait(&mut self, handle: JobHandle) -> JobEvent {
        let event = handle.wait().await;
        self.display = match event.outcome {
            JobOutcome::Completed(_) => DisplayState::ResultShown,
            JobOutcome::Failed(_) => DisplayState::ErrorShown,
        };
        event
    }
}
