//! Remote text-generation client.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::{DEFAULT_MODEL, GenerationParams};
