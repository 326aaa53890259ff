//! Skema configuration.
//!
//! Config file: ~/.config/skema/config.toml, overridable with
//! $SKEMA_CONFIG. A missing file means built-in defaults; a file that
//! exists but does not parse is an error. The API key itself never lives
//! in the file - only the name of the environment variable that holds it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::gemini::{GeminiError, GEMINI_DEFAULT_URL};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "SKEMA_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkemaConfig {
    /// Model used for every generation call.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout for generation calls.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    GEMINI_DEFAULT_URL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for SkemaConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SkemaConfig {
    /// Effective config file path: $SKEMA_CONFIG, else the XDG config dir.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("skema").join("config.toml"))
    }

    /// Load the effective configuration. Missing file falls back to defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the API key through the configured environment variable.
    pub fn api_key(&self) -> Result<String, GeminiError> {
        match env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GeminiError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_complete() {
        let config = SkemaConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, GEMINI_DEFAULT_URL);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"gemini-2.0-pro\"").unwrap();

        let config = SkemaConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.base_url, GEMINI_DEFAULT_URL);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn full_file_round_trips() {
        let config = SkemaConfig {
            model: "gemini-2.0-pro".into(),
            base_url: "http://127.0.0.1:8080".into(),
            api_key_env: "MY_KEY".into(),
            timeout_secs: 10,
        };
        let raw = toml::to_string(&config).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();
        assert_eq!(SkemaConfig::load_from(file.path()).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"not a number\"").unwrap();
        assert!(SkemaConfig::load_from(file.path()).is_err());
    }
}
