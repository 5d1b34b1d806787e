use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use draw_engine::naming::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use draw_engine::{GeminiSettings, SessionSettings, DEFAULT_PRIZE_LABEL};
use serde::Deserialize;
use tracing::warn;

use crate::reveal::RevealTiming;

/// Generative-text endpoint used for creative team names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingEndpoint {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NamingEndpoint {
    fn default() -> Self {
        Self {
            url: GEMINI_BASE_URL.into(),
            model: GEMINI_DEFAULT_MODEL.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Top-level toolbox configuration.
///
/// Layered as: defaults, then the optional TOML file, then environment,
/// then command-line flags (applied by the caller).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    pub naming: NamingEndpoint,
    /// Ask the naming endpoint for team names (falls back to "Team N").
    pub use_ai_names: bool,
    pub default_group_size: usize,
    /// Length of the cycling phase before a draw is committed.
    pub reveal_duration_ms: u64,
    /// How often the displayed candidate changes during the reveal.
    pub reveal_interval_ms: u64,
    pub prize_fallback: String,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            naming: NamingEndpoint::default(),
            use_ai_names: true,
            default_group_size: 2,
            reveal_duration_ms: 2000,
            reveal_interval_ms: 80,
            prize_fallback: DEFAULT_PRIZE_LABEL.into(),
        }
    }
}

impl ToolboxConfig {
    /// Defaults, overlaid with `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Overlay environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.naming.api_key = Some(key);
        }
        if let Some(model) = lookup("HR_TOOLBOX_GEMINI_MODEL") {
            self.naming.model = model;
        }
        if let Some(url) = lookup("HR_TOOLBOX_GEMINI_URL") {
            self.naming.url = url;
        }
        if let Some(raw) = lookup("HR_TOOLBOX_NAMING_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => self.naming.timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid HR_TOOLBOX_NAMING_TIMEOUT_SECS"),
            }
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.naming
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    pub fn naming_timeout(&self) -> Duration {
        Duration::from_secs(self.naming.timeout_secs)
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            base_url: self.naming.url.clone(),
            model: self.naming.model.clone(),
            api_key: self.naming.api_key.clone(),
            timeout: self.naming_timeout(),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            use_ai_names: self.use_ai_names,
            group_size: self.default_group_size,
            prize_fallback: self.prize_fallback.clone(),
            naming_timeout: self.naming_timeout(),
        }
    }

    pub fn reveal_timing(&self) -> RevealTiming {
        RevealTiming {
            duration: Duration::from_millis(self.reveal_duration_ms),
            interval: Duration::from_millis(self.reveal_interval_ms),
        }
    }
}

/// Check if the naming endpoint is reachable (GET {url}/models).
pub async fn check_endpoint(url: &str, api_key: Option<&str>) -> bool {
    let models_url = format!("{}/models", url.trim_end_matches('/'));
    let mut request = reqwest::Client::new()
        .get(&models_url)
        .timeout(Duration::from_secs(5));
    if let Some(key) = api_key {
        request = request.header("x-goog-api-key", key);
    }
    match request.send().await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}
