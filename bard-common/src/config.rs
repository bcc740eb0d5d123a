//! Configuration loading, validation and API token resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `BARD_CONFIG` environment variable
//! 3. Platform config file (`~/.config/bard/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! The resolved [`BardConfig`] is validated once at startup and handed to each
//! component by reference. Components never consult the environment themselves.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "BARD_CONFIG";

/// Environment variables checked for the inference API token, in priority order
pub const TOKEN_ENV_VARS: [&str; 2] = ["BARD_HF_TOKEN", "HF_TOKEN"];

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BardConfig {
    pub models: ModelConfig,
    pub generation: GenerationConfig,
    pub inference: InferenceConfig,
    pub output: OutputConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}

/// Model identifiers for each creative stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Text generation model used for lyrics
    pub lyrics: String,
    /// Text-to-speech model used for vocals
    pub vocals: String,
    /// Music generation model used for the instrumental
    pub music: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            lyrics: "deepseek-ai/DeepSeek-R1-Distill-Qwen-32B".to_string(),
            vocals: "speechbrain/tts-tacotron2-ljspeech".to_string(),
            music: "facebook/musicgen-small".to_string(),
        }
    }
}

/// Sampling parameters for lyrics generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum number of new tokens
    pub max_length: u32,
    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 200,
            temperature: 0.6,
            top_p: 0.9,
            repetition_penalty: 1.1,
        }
    }
}

/// Inference endpoint settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL; models are addressed as `{base_url}/models/{model}`
    pub base_url: String,
    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
    /// API token (lowest priority, environment variables win)
    pub api_token: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            timeout_secs: 120,
            api_token: None,
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Output location for generated songs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("music-examples"),
        }
    }
}

/// How the WAV header byte-rate field is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteRateMode {
    /// `sample_rate * 2` regardless of channel count (reference-compatible)
    #[default]
    Legacy,
    /// `sample_rate * channels * 2`
    Exact,
}

/// Audio output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub byte_rate: ByteRateMode,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "bard_ai=info,bard_common=info".to_string(),
        }
    }
}

impl BardConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BardConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config file and load it, falling back to compiled defaults
    ///
    /// An explicitly named file (argument or `BARD_CONFIG`) must exist.
    /// A missing platform config file is not an error.
    pub fn resolve(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            None => {
                warn!("No configuration file found, using compiled defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Check value ranges; fail fast on misconfiguration
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if !(0.0..=1.0).contains(&generation.temperature) {
            return Err(Error::Config(format!(
                "generation.temperature must be within 0.0-1.0, got {}",
                generation.temperature
            )));
        }
        if generation.max_length == 0 {
            return Err(Error::Config(
                "generation.max_length must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&generation.top_p) || generation.top_p == 0.0 {
            return Err(Error::Config(format!(
                "generation.top_p must be within (0.0, 1.0], got {}",
                generation.top_p
            )));
        }

        for (name, model) in [
            ("models.lyrics", &self.models.lyrics),
            ("models.vocals", &self.models.vocals),
            ("models.music", &self.models.music),
        ] {
            if model.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }

        if self.inference.base_url.trim().is_empty() {
            return Err(Error::Config(
                "inference.base_url must not be empty".to_string(),
            ));
        }
        if self.inference.timeout_secs == 0 {
            return Err(Error::Config(
                "inference.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the inference API token
    ///
    /// **Priority:** `BARD_HF_TOKEN` → `HF_TOKEN` → TOML `inference.api_token`
    pub fn resolve_api_token(&self) -> Result<String> {
        let mut sources = Vec::new();
        let mut resolved: Option<String> = None;

        for var in TOKEN_ENV_VARS {
            if let Ok(token) = std::env::var(var) {
                if is_valid_token(&token) {
                    sources.push(var);
                    if resolved.is_none() {
                        info!("API token loaded from environment variable {}", var);
                        resolved = Some(token);
                    }
                }
            }
        }

        if let Some(token) = &self.inference.api_token {
            if is_valid_token(token) {
                sources.push("TOML");
                if resolved.is_none() {
                    info!("API token loaded from TOML config");
                    resolved = Some(token.clone());
                }
            }
        }

        if sources.len() > 1 {
            warn!(
                "API token found in multiple sources: {}. Using {} (highest priority).",
                sources.join(", "),
                sources[0]
            );
        }

        resolved.ok_or_else(|| {
            Error::Config(
                "Inference API token not configured. Please configure using one of:\n\
                 1. Environment: BARD_HF_TOKEN=your-token or HF_TOKEN=your-token\n\
                 2. TOML config: [inference] api_token = \"your-token\""
                    .to_string(),
            )
        })
    }
}

/// Validate token (non-empty, non-whitespace)
pub fn is_valid_token(token: &str) -> bool {
    !token.trim().is_empty()
}

/// Locate the config file to load, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file, only if present
    default_config_path().filter(|p| p.exists())
}

/// Platform config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bard").join("config.toml"))
}
