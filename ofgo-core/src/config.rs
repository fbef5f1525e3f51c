//! Onboarding settings.
//!
//! Resolution order (later wins): built-in defaults → `<base>/ofgo.yaml` →
//! environment (`OPENAI_API_KEY`, `SKIP_MODEL_CHECK`, `WEBAPP_PORT`) → CLI
//! flags (applied by the binary).

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::layout::Layout;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_HEURISTICS: &str =
    "far-reach-low-coverage,low-cov-with-fuzz-keyword,easy-params-far-reach";
pub const DEFAULT_HARNESS_COUNT: u32 = 2;
pub const DEFAULT_SAMPLE_COUNT: u32 = 1;
pub const DEFAULT_INTROSPECTOR_PORT: u16 = 8080;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// LLM used by the harness generator.
    pub model: String,
    pub temperature: f32,
    /// Comma-separated benchmark heuristics passed to the generator.
    pub heuristics: String,
    /// Number of candidate functions to generate harnesses for.
    pub harness_count: u32,
    /// Samples per candidate. Values above 1 are passed through but only the
    /// first sample is consolidated by default.
    pub sample_count: u32,
    pub introspector_port: u16,
    /// Skip the one-time model validation request.
    pub skip_model_check: bool,
    /// Never read from or written to `ofgo.yaml`.
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            heuristics: DEFAULT_HEURISTICS.to_string(),
            harness_count: DEFAULT_HARNESS_COUNT,
            sample_count: DEFAULT_SAMPLE_COUNT,
            introspector_port: DEFAULT_INTROSPECTOR_PORT,
            skip_model_check: false,
            openai_api_key: None,
        }
    }
}

impl Settings {
    /// Load `<base>/ofgo.yaml`, falling back to defaults when it is absent.
    pub fn load_at(layout: &Layout) -> Result<Self, CoreError> {
        let path = layout.config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| CoreError::ConfigParse { path, source })
    }

    /// Load from file, then apply the process environment.
    pub fn load(layout: &Layout) -> Result<Self, CoreError> {
        Ok(Self::load_at(layout)?.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides using `lookup` (injectable for tests).
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.openai_api_key = Some(key);
        }
        if let Some(flag) = lookup("SKIP_MODEL_CHECK") {
            self.skip_model_check = !matches!(flag.trim(), "0" | "false" | "");
        }
        if let Some(port) = lookup("WEBAPP_PORT").and_then(|p| p.trim().parse().ok()) {
            self.introspector_port = port;
        }
        self
    }
}
