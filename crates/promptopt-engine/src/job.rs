//! Generation job state machine.
//!
//! One [`GenerationJob`] represents a single remote generation request and
//! its lifecycle:
//!
//! ```text
//! Idle  -->  Running  -->  Completed
//!                     \->  Failed
//! ```
//!
//! `Completed` and `Failed` are terminal: there is no retry transition, and
//! a job is discarded once its terminal event has been delivered. The result
//! text and the failure message live inside the corresponding state variant,
//! so a job can never carry both.
//!
//! Jobs are created by validating caller input (the entry guard) and mutated
//! only by the runner; the transition methods are crate-private.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Lifecycle state of a generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Created and validated, not yet started.
    Idle,
    /// The remote call is in flight.
    Running,
    /// The remote call returned non-empty text. Terminal.
    Completed {
        /// The raw response text, before any presentation-layer cleanup.
        text: String,
    },
    /// The remote call failed or returned empty text. Terminal.
    Failed {
        /// Free-text description of what went wrong.
        message: String,
    },
}

impl JobState {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// A single remote generation request.
#[derive(Debug)]
pub struct GenerationJob {
    /// Unique, time-ordered job identifier.
    pub id: Uuid,
    /// The prompt to improve (trimmed).
    pub prompt: String,
    /// The API credential used for this request (trimmed; held only for the
    /// job's lifetime, never persisted by the engine).
    pub credential: String,
    /// When the job was accepted.
    pub submitted_at: DateTime<Utc>,
    /// Current lifecycle state.
    state: JobState,
}

impl GenerationJob {
    /// Create a new job, applying the entry guard.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyCredential`] or [`EngineError::EmptyPrompt`]
    /// if the respective input is empty after trimming surrounding
    /// whitespace. No job exists in that case.
    pub fn new(credential: &str, prompt: &str) -> Result<Self> {
        let credential = credential.trim();
        let prompt = prompt.trim();

        if credential.is_empty() {
            return Err(EngineError::EmptyCredential);
        }
        if prompt.is_empty() {
            return Err(EngineError::EmptyPrompt);
        }

        Ok(Self {
            id: Uuid::now_v7(),
            prompt: prompt.to_owned(),
            credential: credential.to_owned(),
            submitted_at: Utc::now(),
            state: JobState::Idle,
        })
    }

    /// Current state.
    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// `Idle → Running`. Any other starting state is rejected.
    pub(crate) fn start(&mut self) {
        if self.state != JobState::Idle {
            tracing::warn!(job_id = %self.id, state = ?self.state, "ignoring start of non-idle job");
            return;
        }
        self.state = JobState::Running;
    }

    /// `Running → Completed`. Transitions out of a terminal state (or from
    /// `Idle`) are rejected.
    pub(crate) fn complete(&mut self, text: String) {
        if self.state != JobState::Running {
            tracing::warn!(job_id = %self.id, state = ?self.state, "ignoring completion of non-running job");
            return;
        }
        self.state = JobState::Completed { text };
    }

    /// `Running → Failed`. Transitions out of a terminal state (or from
    /// `Idle`) are rejected.
    pub(crate) fn fail(&mut self, message: String) {
        if self.state != JobState::Running {
            tracing::warn!(job_id = %self.id, state = ?self.state, "ignoring failure of non-running job");
            return;
        }
        self.state = JobState::Failed { message };
    }
}

// ---------------------------------------------------------------------------
// Terminal events
// ---------------------------------------------------------------------------

/// The terminal outcome of a job — exactly one of these is delivered per
/// accepted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The raw, non-empty response text.
    Completed(String),
    /// The failure description.
    Failed(String),
}

/// The single event a job's execution context publishes back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEvent {
    /// Which job this event terminates.
    pub job_id: Uuid,
    /// How the job ended.
    pub outcome: JobOutcome,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
