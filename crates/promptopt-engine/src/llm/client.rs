//! Google Gemini client.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API in
//! non-streaming mode — the pipeline delivers one terminal event per job, so
//! there is nothing to stream.
//!
//! The client is the transport layer the engine delegates bounding to: it
//! carries a request timeout, while the job pipeline itself enforces none.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::error::{EngineError, Result};
use crate::llm::types::GenerationParams;
use crate::runner::TextGenerator;

/// Default Generative Language API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Request timeout. This is the transport-level bound on a generation call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// A client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    params: GenerationParams,
    system_instruction: Option<String>,
}

impl GeminiClient {
    /// Create a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RequestFailed`] if the HTTP client cannot be
    /// constructed (e.g. the TLS backend fails to initialize).
    pub fn new(params: GenerationParams) -> Result<Self> {
        Self::with_base_url(params, GEMINI_BASE_URL)
    }

    /// Create a client against a custom base URL (local test servers).
    pub fn with_base_url(params: GenerationParams, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EngineError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            params,
            system_instruction: None,
        })
    }

    /// Attach a system instruction sent with every request (e.g. the
    /// prompt-improvement template).
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Build the JSON body for the `generateContent` endpoint.
    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "generationConfig": {
                "temperature": self.params.temperature,
                "topP": self.params.top_p,
                "topK": self.params.top_k,
                "maxOutputTokens": self.params.max_output_tokens,
            },
        });

        if let Some(instruction) = &self.system_instruction {
            body["systemInstruction"] = json!({
                "parts": [{"text": instruction}],
            });
        }

        body
    }

    /// Perform one non-streaming generation call.
    async fn generate_text(&self, api_key: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.params.model
        );
        let body = self.build_request_body(prompt);

        tracing::debug!(url = %url, model = %self.params.model, "sending generation request");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| EngineError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(EngineError::RequestFailed {
                reason: format!("Gemini API {status}: {}", api_error_detail(&text)),
            });
        }

        let v: Value = serde_json::from_str(&text).map_err(|e| EngineError::RequestFailed {
            reason: format!("invalid JSON response: {e}"),
        })?;

        extract_response_text(&v)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String> {
        self.generate_text(credential, prompt).await
    }
}

// ---------------------------------------------------------------------------
// Response handling (free functions)
// ---------------------------------------------------------------------------

/// Pull the human-readable message out of an error body, falling back to the
/// raw body when it is not the standard `{"error": {"message": ...}}` shape.
fn api_error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}

/// Extract the generated text from a `generateContent` response.
///
/// Concatenates the text of all parts of the first candidate. A response
/// with an embedded error object, no candidates, or only empty text is a
/// failure — the pipeline treats an empty response as a failed job.
fn extract_response_text(v: &Value) -> Result<String> {
    if let Some(message) = v["error"]["message"].as_str() {
        return Err(EngineError::RequestFailed {
            reason: format!("Gemini API error: {message}"),
        });
    }

    let parts = v["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| EngineError::RequestFailed {
            reason: "no candidates in response".into(),
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(EngineError::RequestFailed {
            reason: "model returned an empty response".into(),
        });
    }

    Ok(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
