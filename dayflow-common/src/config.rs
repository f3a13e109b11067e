//! Configuration file loading
//!
//! Secrets and endpoints come from the environment (see the service's
//! command-line arguments). The optional TOML file only tunes model
//! selection and logging, so a missing file is never an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Groq chat model
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Default Gemini model for image parsing
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini model for the "pro" text parser
pub const DEFAULT_GEMINI_PRO_MODEL: &str = "gemini-2.5-pro";

/// Default sampling temperature for all model calls
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub level: Option<String>,
}

/// `[llm]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_pro_model")]
    pub gemini_pro_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// OpenAI-compatible endpoint replacing the public Groq API
    #[serde(default)]
    pub groq_base_url: Option<String>,
    /// Replacement for the public Gemini `v1beta` endpoint
    #[serde(default)]
    pub gemini_base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            groq_model: default_groq_model(),
            gemini_model: default_gemini_model(),
            gemini_pro_model: default_gemini_pro_model(),
            temperature: DEFAULT_TEMPERATURE,
            groq_base_url: None,
            gemini_base_url: None,
        }
    }
}

fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_pro_model() -> String {
    DEFAULT_GEMINI_PRO_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl TomlConfig {
    /// Reject values that would only fail later at request time
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        for (name, value) in [
            ("llm.groq_model", &self.llm.groq_model),
            ("llm.gemini_model", &self.llm.gemini_model),
            ("llm.gemini_pro_model", &self.llm.gemini_pro_model),
        ] {
            if !is_valid_key(value) {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }
        for (name, value) in [
            ("llm.groq_base_url", &self.llm.groq_base_url),
            ("llm.gemini_base_url", &self.llm.gemini_base_url),
        ] {
            if let Some(url) = value {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(Error::Config(format!("{} must be an http(s) URL", name)));
                }
            }
        }
        Ok(())
    }
}

/// Load and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Resolve which config file to read
///
/// An explicit path must exist. Otherwise the per-user default
/// (`~/.config/dayflow/config.toml` on Linux) is used when present.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    Ok(default_config_path().filter(|p| p.exists()))
}

/// Platform config location for Dayflow
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dayflow").join("config.toml"))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
