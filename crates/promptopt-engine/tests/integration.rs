//! Integration tests for the promptopt-engine crate.
//!
//! These tests exercise real tokio tasks and real oneshot delivery against
//! stub generators — every accepted job actually runs on its own task and
//! publishes its terminal event over the channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use promptopt_engine::{
    DisplayState, EngineError, JobOutcome, JobRunner, Orchestrator, Result, TextGenerator,
};
use promptopt_vault::CredentialVault;

// ── stub generators ──────────────────────────────────────────────────────────

/// Succeeds with a fixed response, counting every invocation.
struct FixedGenerator {
    response: String,
    calls: Arc<AtomicUsize>,
}

impl FixedGenerator {
    fn new(response: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                response: response.to_owned(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _credential: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Echoes the prompt back, so concurrent jobs produce distinguishable output.
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, _credential: &str, prompt: &str) -> Result<String> {
        Ok(format!("improved: {prompt}"))
    }
}

/// Always fails, simulating a network error.
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _credential: &str, _prompt: &str) -> Result<String> {
        Err(EngineError::RequestFailed {
            reason: "connection refused".into(),
        })
    }
}

/// Blocks until released, to observe the in-flight state from the caller.
struct GatedGenerator {
    gate: Arc<tokio::sync::Notify>,
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, _credential: &str, _prompt: &str) -> Result<String> {
        self.gate.notified().await;
        Ok("released".into())
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Validation gate
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn empty_credential_is_rejected_without_a_remote_call() {
    let (generator, calls) = FixedGenerator::new("unused");
    let runner = JobRunner::new(Arc::new(generator));

    let err = runner.submit("", "hello").unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, EngineError::EmptyCredential));

    // Give any stray task a chance to run before asserting no call happened.
    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_a_remote_call() {
    let (generator, calls) = FixedGenerator::new("unused");
    let runner = JobRunner::new(Arc::new(generator));

    assert!(matches!(
        runner.submit("key", ""),
        Err(EngineError::EmptyPrompt)
    ));
    assert!(matches!(
        runner.submit("key", "   \n\t"),
        Err(EngineError::EmptyPrompt)
    ));

    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ═══════════════════════════════════════════════════════════════════════
//  Terminal event delivery
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn completed_event_carries_the_exact_response_text() {
    let (generator, calls) = FixedGenerator::new("Improved prompt: be specific.");
    let runner = JobRunner::new(Arc::new(generator));

    let handle = runner.submit("ABC123", "write a haiku").unwrap();
    let id = handle.id;
    let event = handle.wait().await;

    assert_eq!(event.job_id, id);
    assert_eq!(
        event.outcome,
        JobOutcome::Completed("Improved prompt: be specific.".into())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_event_carries_the_error_description() {
    let runner = JobRunner::new(Arc::new(FailingGenerator));

    let handle = runner.submit("ABC123", "write a haiku").unwrap();
    let event = handle.wait().await;

    match event.outcome {
        JobOutcome::Failed(message) => {
            assert!(message.contains("connection refused"), "got: {message}");
        }
        JobOutcome::Completed(text) => panic!("expected Failed, got Completed({text})"),
    }
}

#[tokio::test]
async fn submit_does_not_block_the_caller() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let runner = JobRunner::new(Arc::new(GatedGenerator {
        gate: Arc::clone(&gate),
    }));

    // The generator cannot finish until the gate opens, so submit returning
    // at all proves the remote call runs off the caller's context.
    let handle = runner.submit("key", "prompt").unwrap();

    // The caller is free to keep working while the job is in flight.
    tokio::task::yield_now().await;

    gate.notify_one();
    let event = handle.wait().await;
    assert_eq!(event.outcome, JobOutcome::Completed("released".into()));
}

#[tokio::test]
async fn overlapping_jobs_deliver_independent_events() {
    let runner = JobRunner::new(Arc::new(EchoGenerator));

    // No admission guard: a second submit while the first is in flight just
    // starts an unrelated job with its own handle.
    let first = runner.submit("key", "first prompt").unwrap();
    let second = runner.submit("key", "second prompt").unwrap();
    assert_ne!(first.id, second.id);

    // Await in reverse submission order — delivery is per-handle.
    let second_event = second.wait().await;
    let first_event = first.wait().await;

    assert_eq!(
        second_event.outcome,
        JobOutcome::Completed("improved: second prompt".into())
    );
    assert_eq!(
        first_event.outcome,
        JobOutcome::Completed("improved: first prompt".into())
    );
}

#[tokio::test]
async fn dropping_a_handle_does_not_disturb_other_jobs() {
    let runner = JobRunner::new(Arc::new(EchoGenerator));

    let abandoned = runner.submit("key", "nobody is listening").unwrap();
    drop(abandoned);

    let kept = runner.submit("key", "still here").unwrap();
    let event = kept.wait().await;
    assert_eq!(
        event.outcome,
        JobOutcome::Completed("improved: still here".into())
    );
}

// ═══════════════════════════════════════════════════════════════════════
//  Orchestrator wiring
// ═══════════════════════════════════════════════════════════════════════

fn orchestrator_in(dir: &tempfile::TempDir, generator: Arc<dyn TextGenerator>) -> Orchestrator {
    let vault = CredentialVault::new(dir.path().join("config.json"));
    Orchestrator::new(vault, JobRunner::new(generator))
}

#[tokio::test]
async fn save_then_submit_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let (generator, _) = FixedGenerator::new("the improved prompt");
    let mut orch = orchestrator_in(&dir, Arc::new(generator));

    orch.save_credential("ABC123").unwrap();
    let credential = orch.stored_credential();
    assert_eq!(credential, "ABC123");

    assert_eq!(orch.display_state(), DisplayState::Idle);

    let handle = orch.submit(&credential, "write a haiku").unwrap();
    assert_eq!(orch.display_state(), DisplayState::AwaitingResult);

    let event = orch.wait(handle).await;
    assert_eq!(
        event.outcome,
        JobOutcome::Completed("the improved prompt".into())
    );
    assert_eq!(orch.display_state(), DisplayState::ResultShown);
}

#[tokio::test]
async fn failed_job_moves_display_to_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut orch = orchestrator_in(&dir, Arc::new(FailingGenerator));

    let handle = orch.submit("ABC123", "write a haiku").unwrap();
    let event = orch.wait(handle).await;

    assert!(matches!(event.outcome, JobOutcome::Failed(_)));
    assert_eq!(orch.display_state(), DisplayState::ErrorShown);
}

#[tokio::test]
async fn validation_failure_leaves_display_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (generator, calls) = FixedGenerator::new("unused");
    let mut orch = orchestrator_in(&dir, Arc::new(generator));

    // Nothing stored, so the credential is empty.
    let credential = orch.stored_credential();
    assert_eq!(credential, "");

    let result = orch.submit(&credential, "write a haiku");
    assert!(matches!(result, Err(EngineError::EmptyCredential)));
    assert_eq!(orch.display_state(), DisplayState::Idle);

    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn save_credential_propagates_vault_validation() {
    let dir = tempfile::tempdir().unwrap();
    let (generator, _) = FixedGenerator::new("unused");
    let orch = orchestrator_in(&dir, Arc::new(generator));

    let result = orch.save_credential("   ");
    assert!(matches!(
        result,
        Err(EngineError::Vault(promptopt_vault::VaultError::EmptyCredential))
    ));
    assert_eq!(orch.stored_credential(), "");
}
