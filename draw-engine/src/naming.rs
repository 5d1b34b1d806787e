//! Team-label providers for the grouping engine.
//!
//! A `GroupNamer` is asked for exactly `count` labels. It may fail or come
//! back short; the grouping engine fills every missing position with the
//! deterministic `"Team N"` fallback, so a namer fault never aborts grouping.
//!
//! `GeminiNamer` asks the Gemini `generateContent` endpoint for a JSON array
//! of creative team names. `FallbackNamer` never leaves the process.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Default Gemini REST base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model for team-name generation.
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Errors from a naming collaborator. Never surfaced past the grouping engine.
#[derive(Debug, Error)]
pub enum NamingError {
    #[error("API key not configured for {0}")]
    MissingApiKey(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response parse error: {0}")]
    ParseError(String),
}

/// Source of display labels for groups.
#[async_trait]
pub trait GroupNamer: Send + Sync {
    /// Short identifier used in logs.
    fn provider(&self) -> &'static str;

    /// Produce `count` labels.
    async fn names(&self, count: usize) -> Result<Vec<String>, NamingError>;
}

/// The deterministic label for the group at `index` (0-based).
pub fn fallback_label(index: usize) -> String {
    format!("Team {}", index + 1)
}

/// `["Team 1", ..., "Team count"]`.
pub fn fallback_labels(count: usize) -> Vec<String> {
    (0..count).map(fallback_label).collect()
}

/// Namer that always returns the fallback labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNamer;

#[async_trait]
impl GroupNamer for FallbackNamer {
    fn provider(&self) -> &'static str {
        "fallback"
    }

    async fn names(&self, count: usize) -> Result<Vec<String>, NamingError> {
        Ok(fallback_labels(count))
    }
}

/// Settings for `GeminiNamer`.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gemini-backed team namer.
pub struct GeminiNamer {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiNamer {
    pub fn new(settings: GeminiSettings) -> Result<Self, NamingError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| NamingError::RequestFailed(e.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn prompt(count: usize) -> String {
        format!(
            "Generate {count} creative, professional, and fun team names for a corporate \
             environment. Return only the names in a JSON array format."
        )
    }
}

#[async_trait]
impl GroupNamer for GeminiNamer {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    async fn names(&self, count: usize) -> Result<Vec<String>, NamingError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| NamingError::MissingApiKey("gemini".into()))?;

        let start = Instant::now();

        let request_body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": Self::prompt(count) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            }
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NamingError::Timeout(self.settings.timeout)
                } else {
                    NamingError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NamingError::RequestFailed(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NamingError::ParseError(e.to_string()))?;

        let text = resp_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("");

        let labels = parse_label_array(text)?;
        debug!(
            requested = count,
            received = labels.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Gemini team names received"
        );
        Ok(labels)
    }
}

/// Parse the model's text payload as a JSON array of strings.
///
/// Tolerates a Markdown code fence around the array.
pub fn parse_label_array(text: &str) -> Result<Vec<String>, NamingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NamingError::ParseError("empty response text".into()));
    }

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str::<Vec<String>>(body).map_err(|e| NamingError::ParseError(e.to_string()))
}
