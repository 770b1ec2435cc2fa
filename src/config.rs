//! Debate configuration.
//!
//! Configuration is read from a YAML file:
//!
//! ```yaml
//! personas:
//!   agent_a: { id: agent_a, name: Scientist, role: Research Scientist }
//!   agent_b: { id: agent_b, name: Philosopher, role: Moral Philosopher }
//! max_rounds: 8
//! seed: 42
//! log_path: logs/debate.json
//! generation:
//!   model: openai/gpt-4o-mini
//!   temperature: 0.7
//!   max_tokens: 200
//!   timeout_secs: 60
//! ```
//!
//! Every field is optional. The LLM endpoint itself is taken from the
//! environment (see [`crate::llm::LiteLlmClient::from_env`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::debate::controller::DEFAULT_MAX_ROUNDS;
use crate::debate::generator::LlmGeneratorConfig;
use crate::debate::orchestrator::DebateSettings;
use crate::debate::persona::Personas;
use crate::error::ConfigError;

/// Default location of the debate record.
pub const DEFAULT_LOG_PATH: &str = "logs/debate.json";

/// Text generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Model identifier; empty uses the client's default.
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Upper bound on one generation call, in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 200,
            timeout_secs: 60,
        }
    }
}

/// Top-level debate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    pub personas: Personas,
    /// Number of turns in the debate. Should be even so both sides speak
    /// equally often; odd values are accepted with a warning.
    pub max_rounds: usize,
    /// Run seed; drawn at random when absent.
    pub seed: Option<u64>,
    /// Where the JSON record is written.
    pub log_path: PathBuf,
    pub generation: GenerationSettings,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            personas: Personas::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            generation: GenerationSettings::default(),
        }
    }
}

impl DebateConfig {
    /// Parses and validates a YAML document. The log path is used verbatim.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_rounds must be greater than 0".to_string(),
            ));
        }

        for (side, persona) in [
            ("agent_a", &self.personas.agent_a),
            ("agent_b", &self.personas.agent_b),
        ] {
            if persona.id.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "personas.{}.id cannot be empty",
                    side
                )));
            }
            if persona.name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "personas.{}.name cannot be empty",
                    side
                )));
            }
        }

        if self.personas.agent_a.id == self.personas.agent_b.id {
            return Err(ConfigError::ValidationFailed("persona ids must differ".to_string()));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationFailed(
                "generation.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "generation.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.max_rounds % 2 == 1 {
            tracing::warn!(
                max_rounds = self.max_rounds,
                "max_rounds is odd; the debaters will not get equal turns"
            );
        }

        Ok(())
    }

    /// Overrides the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the round limit.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Overrides the log path. Used verbatim.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Orchestrator settings for a run with the given resolved seed.
    pub fn debate_settings(&self, seed: u64) -> DebateSettings {
        DebateSettings::new()
            .with_max_rounds(self.max_rounds)
            .with_seed(seed)
            .with_personas(self.personas.clone())
    }

    /// Settings for the LLM-backed turn generator.
    pub fn generator_config(&self) -> LlmGeneratorConfig {
        LlmGeneratorConfig {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
            timeout: Duration::from_secs(self.generation.timeout_secs),
        }
    }
}

/// Appends a `_%Y%m%d_%H%M%S` stamp to the file stem of a relative path.
///
/// Absolute paths are returned unchanged.
pub fn stamp_log_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "debate".to_string());
    let mut name = format!("{}_{}", stem, now.format("%Y%m%d_%H%M%S"));
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Loads configuration from a YAML file.
///
/// A relative `log_path` is stamped with the current local time so repeated
/// runs do not overwrite each other.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Yaml`
/// if it does not parse and `ConfigError::ValidationFailed` if a value is
/// out of range.
pub fn load_config(path: impl AsRef<Path>) -> Result<DebateConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut config = DebateConfig::from_yaml_str(&raw)?;
    config.log_path = stamp_log_path(&config.log_path, Local::now());

    tracing::debug!(
        path = %path.display(),
        max_rounds = config.max_rounds,
        log_path = %config.log_path.display(),
        "Configuration loaded"
    );
    Ok(config)
}
