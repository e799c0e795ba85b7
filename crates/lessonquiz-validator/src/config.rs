//! Validator configuration and factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http::{HttpValidator, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Settings for the remote answer validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Base URL of the lesson backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds before a validation call is abandoned and judged incorrect.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ValidatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level lessonquiz configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonQuizConfig {
    #[serde(default)]
    pub validator: ValidatorConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `lessonquiz.toml` in the current directory
/// 2. `~/.config/lessonquiz/config.toml`
///
/// Environment variable override: `LESSONQUIZ_VALIDATOR_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<LessonQuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("lessonquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<LessonQuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LessonQuizConfig::default(),
    };

    if let Ok(url) = std::env::var("LESSONQUIZ_VALIDATOR_URL") {
        config.validator.base_url = url;
    }

    config.validator.base_url = resolve_env_vars(&config.validator.base_url);
    anyhow::ensure!(
        config.validator.timeout_secs > 0,
        "validator.timeout_secs must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lessonquiz"))
}

/// Create an HTTP validator from its configuration.
pub fn create_validator(config: &ValidatorConfig) -> Result<HttpValidator> {
    HttpValidator::new(&config.base_url, config.timeout())
        .with_context(|| format!("failed to create validator for {}", config.base_url))
}
