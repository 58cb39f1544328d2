//! Generation pipeline for promptopt.
//!
//! This crate owns everything between "the user pressed submit" and "one
//! terminal event arrived": input validation, the job state machine, the
//! tokio task that isolates the remote call from the caller, the Gemini
//! client, and the orchestration facade the presentation layer drives.
//!
//! # Modules
//!
//! - [`job`] — the [`GenerationJob`] state machine and terminal event types.
//! - [`runner`] — the [`JobRunner`], [`JobHandle`], and the
//!   [`TextGenerator`] seam.
//! - [`llm`] — the [`GeminiClient`] and its generation parameters.
//! - [`orchestrator`] — the [`Orchestrator`] facade and display state.
//! - [`prompt`] — the fixed prompt-improvement instruction.
//! - [`error`] — unified error types.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use promptopt_engine::llm::{GeminiClient, GenerationParams};
//! use promptopt_engine::{JobOutcome, JobRunner, prompt};
//!
//! # async fn example() -> promptopt_engine::Result<()> {
//! let client = GeminiClient::new(GenerationParams::default())?
//!     .with_system_instruction(prompt::IMPROVEMENT_INSTRUCTION);
//! let runner = JobRunner::new(Arc::new(client));
//!
//! let handle = runner.submit("AIza-example-key", "write a haiku")?;
//! match handle.wait().await.outcome {
//!     JobOutcome::Completed(text) => println!("{text}"),
//!     JobOutcome::Failed(message) => eprintln!("failed: {message}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod runner;

// Re-export the most commonly used types at the crate root for convenience.
pub use error::{EngineError, Result};
pub use job::{GenerationJob, JobEvent, JobOutcome, JobState};
pub use llm::GeminiClient;
pub use orchestrator::{DisplayState, Orchestrator};
pub use runner::{JobHandle, JobRunner, TextGenerator};
