//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `LOOKBOOK_API_KEY`, `GEMINI_API_KEY`, `API_KEY`
//! 2. Project-local: `.lookbook/config.toml`
//! 3. Global: `~/.lookbook/config.toml`

use lookbook_core::{LookbookError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for the API key, highest priority first
pub const API_KEY_ENV_VARS: [&str; 3] = ["LOOKBOOK_API_KEY", "GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Image service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_key: None,
            api_url: None,
            model: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider_name() -> String {
    "gemini".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Images per run
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Refuse Lifestyle runs without a model photo. When false, Lifestyle
    /// falls back to the product-only template variants.
    #[serde(default = "default_true")]
    pub lifestyle_requires_model: bool,
    /// Where exported images are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            lifestyle_requires_model: true,
            output_dir: default_output_dir(),
        }
    }
}

fn default_batch_size() -> usize {
    crate::pipeline::DEFAULT_BATCH_SIZE
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "lookbook-output".to_string()
}

/// Top-level config, as written in `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookbookConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// One config file as written. Every key is optional so that a layer only
/// overrides what it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    provider: ProviderLayer,
    #[serde(default)]
    generation: GenerationLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProviderLayer {
    name: Option<String>,
    api_key: Option<String>,
    api_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerationLayer {
    batch_size: Option<usize>,
    lifestyle_requires_model: Option<bool>,
    output_dir: Option<String>,
}

impl LookbookConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut layers = Vec::new();

        // Layer 1: Global config (~/.lookbook/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                layers.push(global_path);
            }
        }

        // Layer 2: Project-local config (.lookbook/config.toml)
        let local_path = PathBuf::from(".lookbook/config.toml");
        if local_path.exists() {
            layers.push(local_path);
        }

        // Layer 3: Environment variable overrides
        let config = Self::load_layers(&layers)?;
        tracing::debug!(provider = %config.provider.name, "configuration loaded");
        Ok(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_layers(&[path.to_path_buf()])
    }

    /// Merge the given files over the defaults, later files winning, then
    /// apply environment overrides
    pub fn load_layers(paths: &[PathBuf]) -> Result<Self> {
        let mut config = LookbookConfig::default();
        for path in paths {
            let layer = Self::load_file(path)?;
            Self::merge_into(&mut config, layer);
        }
        Self::apply_env_overrides(&mut config);
        Ok(config)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.provider
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn api_url(&self) -> &str {
        self.provider.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn model(&self) -> &str {
        self.provider.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".lookbook").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ConfigLayer> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            LookbookError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut LookbookConfig, overlay: ConfigLayer) {
        let provider = overlay.provider;
        if let Some(name) = provider.name {
            base.provider.name = name;
        }
        if provider.api_key.is_some() {
            base.provider.api_key = provider.api_key;
        }
        if provider.api_url.is_some() {
            base.provider.api_url = provider.api_url;
        }
        if provider.model.is_some() {
            base.provider.model = provider.model;
        }
        if let Some(timeout_secs) = provider.timeout_secs {
            base.provider.timeout_secs = timeout_secs;
        }

        let generation = overlay.generation;
        if let Some(batch_size) = generation.batch_size {
            base.generation.batch_size = batch_size;
        }
        if let Some(required) = generation.lifestyle_requires_model {
            base.generation.lifestyle_requires_model = required;
        }
        if let Some(output_dir) = generation.output_dir {
            base.generation.output_dir = output_dir;
        }
    }

    fn apply_env_overrides(config: &mut LookbookConfig) {
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty());
        if let Some(key) = from_env {
            config.provider.api_key = Some(key);
        }
    }
}
