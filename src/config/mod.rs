//! Application Configuration
//!
//! Endpoint, presentation and worker settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prompt used when the user leaves the prompt field empty
pub const DEFAULT_PROMPT: &str =
    "Describe this image in detail. Identify objects, people, or scenes present.";

/// Smallest selectable result font size
pub const MIN_FONT_SIZE: u32 = 10;
/// Largest selectable result font size
pub const MAX_FONT_SIZE: u32 = 24;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inference endpoint settings
    pub api: ApiSettings,
    /// Window presentation settings
    pub ui: UiSettings,
    /// Worker pool settings
    pub performance: PerformanceConfig,
}

impl AppConfig {
    /// Build the full `generateContent` URL for the configured model
    pub fn endpoint_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api.base_url.trim_end_matches('/'),
            self.api.model,
            api_key
        )
    }
}

/// Inference endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the generative language API
    pub base_url: String,
    /// Model name used in the request path
    pub model: String,
    /// API key, overridden by `--api-key` or `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// Per-request timeout; no timeout when unset
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Window presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Result text font size in points
    pub font_size: u32,
    /// Start in dark mode
    pub dark_mode: bool,
    /// Prompt sent when the prompt field is empty
    pub default_prompt: String,
    /// Edge length of the square preview box in pixels
    pub preview_size: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 12,
            dark_mode: false,
            default_prompt: DEFAULT_PROMPT.to_string(),
            preview_size: 400,
        }
    }
}

/// Worker pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads available to analysis tasks
    pub worker_threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { worker_threads: 4 }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
