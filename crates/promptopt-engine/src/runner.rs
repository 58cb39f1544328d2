//! Asynchronous job execution.
//!
//! The [`JobRunner`] validates a submission synchronously, then runs the
//! remote call on its own tokio task so the caller is never blocked. Exactly
//! one terminal [`JobEvent`] is published per accepted job, over a oneshot
//! channel owned by that job's [`JobHandle`] — there is no shared "current
//! job" slot, so overlapping submissions cannot orphan each other's events.
//!
//! The runner enforces no timeout and performs no retries; bounding the call
//! is left to the HTTP client, and a `Failed` event is final. Dropping a
//! handle discards interest in the event without aborting the remote call.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::Result;
use crate::job::{GenerationJob, JobEvent, JobOutcome};

// ---------------------------------------------------------------------------
// Generator seam
// ---------------------------------------------------------------------------

/// The remote text-generation capability the runner executes jobs against.
///
/// Implemented by the Gemini client in production and by stubs in tests.
/// Implementations must return non-empty text on success; an empty response
/// is a failure (`Err`), not a degenerate success.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Perform one generation request and return the raw response text.
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Job handle
// ---------------------------------------------------------------------------

/// Caller-owned handle to one submitted job.
///
/// Await [`wait`](Self::wait) to receive the job's single terminal event.
/// Each handle is independent: submitting again while a job is in flight
/// creates a new job with its own handle and no relationship to this one.
#[derive(Debug)]
pub struct JobHandle {
    /// The id of the submitted job.
    pub id: Uuid,
    rx: oneshot::Receiver<JobEvent>,
}

impl JobHandle {
    /// Wait for the job's terminal event.
    ///
    /// Always yields an event: if the execution task dies without reporting
    /// (which only a panic inside the generator can cause), a synthetic
    /// `Failed` event is produced so the exactly-once contract holds for
    /// the caller.
    pub async fn wait(self) -> JobEvent {
        match self.rx.await {
            Ok(event) => event,
            Err(_) => JobEvent {
                job_id: self.id,
                outcome: JobOutcome::Failed("generation task terminated unexpectedly".into()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Validates submissions and runs accepted jobs off the caller's context.
pub struct JobRunner {
    generator: Arc<dyn TextGenerator>,
}

impl JobRunner {
    /// Create a runner that executes jobs against `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Submit one generation request.
    ///
    /// Validation happens synchronously: an empty (post-trim) credential or
    /// prompt is rejected before any job exists and before any I/O. On
    /// acceptance the job is spawned immediately and the returned handle
    /// will eventually yield exactly one terminal event.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyCredential`](crate::EngineError::EmptyCredential) or
    /// [`EngineError::EmptyPrompt`](crate::EngineError::EmptyPrompt) when the
    /// entry guard rejects the inputs.
    pub fn submit(&self, credential: &str, prompt: &str) -> Result<JobHandle> {
        let mut job = GenerationJob::new(credential, prompt)?;
        let id = job.id;

        let (tx, rx) = oneshot::channel();
        let generator = Arc::clone(&self.generator);

        tokio::spawn(async move {
            job.start();
            tracing::info!(job_id = %job.id, prompt_len = job.prompt.len(), "generation job running");

            let outcome = match generator.generate(&job.credential, &job.prompt).await {
                Ok(text) => {
                    job.complete(text.clone());
                    tracing::info!(job_id = %job.id, response_len = text.len(), "generation job completed");
                    JobOutcome::Completed(text)
                }
                Err(e) => {
                    let message = e.to_string();
                    job.fail(message.clone());
                    tracing::warn!(job_id = %job.id, error = %message, "generation job failed");
                    JobOutcome::Failed(message)
                }
            };

            if tx.send(JobEvent { job_id: id, outcome }).is_err() {
                tracing::debug!(job_id = %id, "terminal event dropped — caller gave up waiting");
            }
        });

        Ok(JobHandle { id, rx })
    }
}
