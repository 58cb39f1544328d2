//! CLI entry point for promptopt.
//!
//! This binary provides the `promptopt` command: store a Gemini API key
//! (encrypted at rest) and submit prompts for improvement, either one-shot
//! or in an interactive session.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use promptopt_engine::llm::{GeminiClient, GenerationParams};
use promptopt_engine::{JobOutcome, JobRunner, Orchestrator, prompt};
use promptopt_vault::CredentialVault;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// promptopt — improve your AI prompts.
#[derive(Parser)]
#[command(
    name = "promptopt",
    version,
    about = "promptopt — AI prompt optimizer",
    long_about = "Stores your Gemini API key encrypted on disk and rewrites free-text \
                  prompts to be clearer and more effective for AI models."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session.
    Run,

    /// Save an API key (encrypted) for later sessions.
    SetKey {
        /// The API key to store.
        key: String,
    },

    /// Improve a single prompt and exit.
    Improve {
        /// The prompt to improve.
        prompt: String,
    },

    /// Show how to get started.
    Guide,

    /// Show whether a key is stored and where.
    Status,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => cmd_run().await,
        Commands::SetKey { key } => cmd_set_key(&key),
        Commands::Improve { prompt } => cmd_improve(&prompt).await,
        Commands::Guide => cmd_guide(),
        Commands::Status => cmd_status(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Construct the orchestrator over the default vault and the Gemini client.
///
/// These are the startup dependencies: if the config location cannot be
/// resolved or the HTTP client cannot be built, the process exits non-zero
/// with a diagnostic. Everything after startup is handled in place.
fn build_orchestrator() -> Result<Orchestrator> {
    let vault = CredentialVault::open_default()
        .context("failed to resolve the config file location")?;

    let client = GeminiClient::new(GenerationParams::default())
        .context("failed to initialize the HTTP client")?
        .with_system_instruction(prompt::IMPROVEMENT_INSTRUCTION);

    Ok(Orchestrator::new(vault, JobRunner::new(Arc::new(client))))
}

// ---------------------------------------------------------------------------
// Subcommand: run
// ---------------------------------------------------------------------------

async fn cmd_run() -> Result<()> {
    let mut orch = build_orchestrator()?;

    println!();
    println!("  promptopt v{}", env!("CARGO_PKG_VERSION"));
    println!("  Type a prompt to improve it, ':key <value>' to store an API key,");
    println!("  or 'quit' to exit.");
    println!();

    if orch.stored_credential().is_empty() {
        println!("  No API key stored yet — see 'promptopt guide'.");
        println!();
    }

    let stdin = io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if trimmed == "quit" || trimmed == "exit" {
            info!("user requested exit");
            break;
        }

        if trimmed == ":key" || trimmed.starts_with(":key ") {
            let key = trimmed.strip_prefix(":key").unwrap_or_default();
            match orch.save_credential(key) {
                Ok(()) => println!("API key saved."),
                Err(e) => eprintln!("could not save the API key: {e}"),
            }
            continue;
        }

        // Anything else is a prompt to improve.
        let credential = orch.stored_credential();
        let handle = match orch.submit(&credential, trimmed) {
            Ok(handle) => handle,
            Err(e) if e.is_validation() => {
                eprintln!("{e} — store one with ':key <value>' first");
                continue;
            }
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        println!("Improving…");
        io::stdout().flush().ok();

        match orch.wait(handle).await.outcome {
            JobOutcome::Completed(text) => {
                println!();
                println!("{}", render::render_response(&text));
                println!();
            }
            JobOutcome::Failed(message) => {
                eprintln!("request failed: {message}");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: set-key
// ---------------------------------------------------------------------------

fn cmd_set_key(key: &str) -> Result<()> {
    let orch = build_orchestrator()?;

    orch.save_credential(key)
        .context("could not save the API key")?;

    println!("API key saved to {}", orch.config_path().display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: improve
// ---------------------------------------------------------------------------

async fn cmd_improve(user_prompt: &str) -> Result<()> {
    let mut orch = build_orchestrator()?;

    let credential = orch.stored_credential();
    if credential.is_empty() {
        bail!("no API key stored — run 'promptopt set-key <KEY>' first");
    }

    let handle = orch
        .submit(&credential, user_prompt)
        .context("submission rejected")?;

    match orch.wait(handle).await.outcome {
        JobOutcome::Completed(text) => {
            println!("{}", render::render_response(&text));
            Ok(())
        }
        JobOutcome::Failed(message) => bail!("request failed: {message}"),
    }
}

// ---------------------------------------------------------------------------
// Subcommand: guide
// ---------------------------------------------------------------------------

const GUIDE: &str = "\
Welcome to promptopt!

promptopt rewrites your prompts to be clearer, more structured, and more
effective for AI models, while keeping their original meaning.

1. Get an API key
   - Visit https://aistudio.google.com/ and create a key for the Gemini API.

2. Store the key
   - promptopt set-key <KEY>
   - The key is encrypted and written to your Documents folder; you only
     need to do this once.

3. Improve a prompt
   - promptopt improve \"your prompt here\"
   - or start 'promptopt run' and type prompts interactively.

Tips:
   - The optimizer preserves your intent — it only improves the wording.
   - You can run the same prompt through it more than once.
   - Any kind of prompt works: questions, instructions, descriptions.";

fn cmd_guide() -> Result<()> {
    println!("{GUIDE}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

fn cmd_status() -> Result<()> {
    let orch = build_orchestrator()?;

    if orch.stored_credential().is_empty() {
        println!("No API key stored (or the stored key is unreadable).");
    } else {
        println!("An API key is stored.");
    }
    println!("Config file: {}", orch.config_path().display());
    Ok(())
}
