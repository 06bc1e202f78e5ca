//! HeartGarden configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main HeartGarden configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Conversation flow timing and policy
    pub flow: FlowConfig,

    /// Companion persona settings
    pub companion: CompanionConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key environment variable is set.
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .heartgarden.yml
        let local_config = PathBuf::from(".heartgarden.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/heartgarden/heartgarden.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("heartgarden").join("heartgarden.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("Environment variable {} is not set", self.api_key_env))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_ms: 30_000,
        }
    }
}

/// Conversation flow timing and policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// How long a reply is shown on the loading stage before advancing
    #[serde(rename = "display-delay-ms")]
    pub display_delay_ms: u64,

    /// How long the final message is shown before handing off to the garden
    #[serde(rename = "final-delay-ms")]
    pub final_delay_ms: u64,

    /// Transcript length (in turns) past which a warning is logged
    #[serde(rename = "transcript-warn-turns")]
    pub transcript_warn_turns: usize,
}

impl FlowConfig {
    pub fn display_delay(&self) -> Duration {
        Duration::from_millis(self.display_delay_ms)
    }

    pub fn final_delay(&self) -> Duration {
        Duration::from_millis(self.final_delay_ms)
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            display_delay_ms: 1500,
            final_delay_ms: 3000,
            transcript_warn_turns: 40,
        }
    }
}

/// Companion persona settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Name the companion introduces itself with
    pub name: String,

    /// Directory checked first for a `companion.pmt` prompt override
    #[serde(rename = "prompt-dir")]
    pub prompt_dir: Option<PathBuf>,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            name: "Aegis".to_string(),
            prompt_dir: None,
        }
    }
}
