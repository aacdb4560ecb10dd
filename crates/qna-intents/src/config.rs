//! TOML configuration parsing and validation.
//!
//! Every key is optional. A missing config file means "use the defaults";
//! a file that exists but does not parse, or sets an empty path, is an
//! error.
//!
//! ```toml
//! [catalog]
//! path = "./data/question_templates.json"
//!
//! [model]
//! path = "./data/intents_model.json"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./data/question_templates.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./data/intents_model.json")
}

impl Config {
    /// Configuration used when no config file is present.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Load `path`, falling back to [`Config::minimal`] when the file is absent.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::minimal());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    if config.catalog.path.as_os_str().is_empty() {
        bail!("catalog.path must not be empty");
    }
    if config.model.path.as_os_str().is_empty() {
        bail!("model.path must not be empty");
    }

    Ok(config)
}
