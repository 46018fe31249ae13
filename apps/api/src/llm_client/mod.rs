/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
///
/// The client holds the whole provisioned key pool and rotates across it:
/// a transport failure, a 429, or a 5xx on one key advances to the next key
/// after a short backoff. Quota exhaustion on a single key therefore does not
/// fail the request as long as another key still has headroom.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.0-flash";
const ROTATE_BACKOFF_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no Gemini API keys are configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("all {attempts} provisioned API keys failed")]
    KeysExhausted { attempts: u32 },

    #[error("model returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Extracts the text of the first candidate's first part.
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

/// The seam between the analysis pipeline and the LLM backend.
///
/// Carried in `AppState` as `Arc<dyn TextModel>` so handler tests can assert
/// that invalid uploads never reach the model.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Sends one prompt and returns the model's text response.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Gemini-backed `TextModel` with key rotation.
///
/// `cursor` remembers the last key that succeeded, so the next request starts
/// there instead of re-hitting a key that just ran out of quota.
pub struct GeminiClient {
    client: reqwest::Client,
    keys: Vec<String>,
    cursor: AtomicUsize,
    base_url: String,
}

impl GeminiClient {
    pub fn new(keys: Vec<String>) -> Self {
        Self::with_base_url(keys, GEMINI_API_BASE.to_string())
    }

    fn with_base_url(keys: Vec<String>, base_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            keys,
            cursor: AtomicUsize::new(0),
            base_url,
        }
    }

    #[cfg(test)]
    fn for_tests(keys: Vec<String>, base_url: String) -> Self {
        Self::with_base_url(keys, base_url)
    }
}

/// Backoff before trying key number `attempt` (attempt >= 1). Doubles per
/// attempt, capped so large key pools cannot overflow the shift or stall a
/// request for minutes.
fn rotation_delay(attempt: usize) -> std::time::Duration {
    let exponent = (attempt - 1).min(6) as u32;
    std::time::Duration::from_millis(ROTATE_BACKOFF_MS * (1u64 << exponent))
}

/// A 429 or any 5xx means this key is throttled or the backend hiccuped;
/// another key is worth trying. Remaining 4xx codes (bad request, invalid
/// key format rejected as 400) will fail identically on every key.
fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.keys.is_empty() {
            return Err(LlmError::NotConfigured);
        }

        let request_body = GeminiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let start = self.cursor.load(Ordering::Relaxed) % self.keys.len();

        for attempt in 0..self.keys.len() {
            if attempt > 0 {
                let delay = rotation_delay(attempt);
                warn!(
                    "Gemini call attempt {} failed, rotating key after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let index = (start + attempt) % self.keys.len();
            let url = format!(
                "{}/{}:generateContent?key={}",
                self.base_url.trim_end_matches('/'),
                MODEL,
                self.keys[index]
            );

            let response = match self.client.post(&url).json(&request_body).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!("Gemini transport error on key #{index}: {e}");
                    continue;
                }
            };

            let status = response.status();

            if is_retryable(status) {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {status} on key #{index}: {body}");
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to pull the provider's message out of the error envelope
                let message = serde_json::from_str::<GeminiErrorBody>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GeminiResponse = response.json().await?;
            let text = parsed.text().ok_or(LlmError::EmptyContent)?;
            if text.trim().is_empty() {
                return Err(LlmError::EmptyContent);
            }

            // Next request starts from the key that just worked
            self.cursor.store(index, Ordering::Relaxed);
            debug!("Gemini call succeeded on key #{index}");
            return Ok(text.to_string());
        }

        Err(LlmError::KeysExhausted {
            attempts: self.keys.len() as u32,
        })
    }
}
