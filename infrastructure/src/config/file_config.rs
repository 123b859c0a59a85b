//! Raw TOML configuration data types
//!
//! These structs mirror the config file one-to-one. Every section is
//! `#[serde(default)]`, so a partial file (or none at all) still yields a
//! complete configuration.
//!
//! ```toml
//! [model]
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [turn]
//! max_steps = 6
//! parallel_tool_calls = true
//!
//! [services]
//! pricing_url = "https://calculadora-presupuestos-laser.onrender.com"
//!
//! [catalog]
//! source = "remote"
//! ```

use arkcutt_application::config::TurnConfig;
use arkcutt_domain::Model;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("turn.max_steps cannot be 0")]
    InvalidMaxSteps,

    #[error("{section}.timeout_seconds cannot be 0")]
    InvalidTimeout { section: &'static str },

    #[error("{field} cannot be empty")]
    EmptyUrl { field: &'static str },

    #[error("model name cannot be empty")]
    EmptyModelName,
}

/// Chat model endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// OpenAI-compatible base URL (without `/chat/completions`)
    pub base_url: String,
    pub model: Model,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: Model::default(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTurnConfig {
    /// Step ceiling per user turn
    pub max_steps: usize,
    /// Run the calls of one batch concurrently
    pub parallel_tool_calls: bool,
}

impl Default for FileTurnConfig {
    fn default() -> Self {
        Self {
            max_steps: arkcutt_application::config::DEFAULT_MAX_STEPS,
            parallel_tool_calls: true,
        }
    }
}

/// Collaborator service locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServicesConfig {
    /// File-analysis service (`POST /analyze-dxf`)
    pub analyzer_url: String,
    /// Pricing service (`POST /calculate`, `GET /materiales`)
    pub pricing_url: String,
    /// Generative design service (`POST /api/v1/generate`)
    pub generator_url: String,
    /// Per-request time-out for every collaborator call
    pub timeout_seconds: u64,
}

impl Default for FileServicesConfig {
    fn default() -> Self {
        Self {
            analyzer_url: "https://dxf-analyzer-api.onrender.com".to_string(),
            pricing_url: "https://calculadora-presupuestos-laser.onrender.com".to_string(),
            generator_url: "https://backend-dxf.onrender.com".to_string(),
            timeout_seconds: 60,
        }
    }
}

/// Where `getMaterialOptions` reads materials from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    Static,
    Remote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub source: CatalogSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every turn
    pub conversation_log: Option<PathBuf>,
    /// Diagnostic log file (in addition to stderr)
    pub log_file: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub model: FileModelConfig,
    pub turn: FileTurnConfig,
    pub services: FileServicesConfig,
    pub catalog: FileCatalogConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.turn.max_steps == 0 {
            return Err(ConfigValidationError::InvalidMaxSteps);
        }
        if self.model.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout { section: "model" });
        }
        if self.services.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                section: "services",
            });
        }

        let urls = [
            ("model.base_url", &self.model.base_url),
            ("services.analyzer_url", &self.services.analyzer_url),
            ("services.pricing_url", &self.services.pricing_url),
            ("services.generator_url", &self.services.generator_url),
        ];
        for (field, url) in urls {
            if url.trim().is_empty() {
                return Err(ConfigValidationError::EmptyUrl { field });
            }
        }

        Ok(())
    }

    /// Turn settings for the step controller
    pub fn turn_config(&self) -> TurnConfig {
        TurnConfig::default()
            .with_model(self.model.model.clone())
            .with_max_steps(self.turn.max_steps)
            .with_parallel_tool_calls(self.turn.parallel_tool_calls)
    }
}
