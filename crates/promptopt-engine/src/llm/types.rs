//! Configuration types for the Gemini client.

use serde::{Deserialize, Serialize};

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sampling and length parameters sent with every generation request.
///
/// The defaults are tuned for prompt rewriting: creative enough to rephrase,
/// constrained enough to stay faithful to the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model identifier (e.g. `"gemini-2.0-flash"`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum tokens the model may generate.
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 4096,
        }
    }
}
