//! AI backend configuration
//!
//! Configuration is resolved in two layers:
//! 1. A TOML file (`--config PATH`, or `~/.config/brief/config.toml` if present)
//! 2. Environment variables for anything the file leaves unset
//!
//! ```toml
//! backend = "openai_compatible"
//! host = "https://api.openai.com"
//! model = "gpt-4o-mini"
//! api_key_file = "/run/secrets/llm_api_key"
//! default_confidence = 0.85
//! ```
//!
//! Environment variables:
//! - `BRIEF_AI_BACKEND`: ollama, openai_compatible, mock. Default: ollama
//! - `OLLAMA_HOST` / `OLLAMA_MODEL` (default model: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST` / `OPENAI_COMPATIBLE_MODEL` (default model: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key read from the environment
//! - `OPENAI_COMPATIBLE_API_KEY_FILE`: path to a secret file holding the key
//!
//! API keys are never stored in the config file itself; the file can only
//! name the env var or the secret file to read.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const BACKEND_ENV: &str = "BRIEF_AI_BACKEND";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_COMPATIBLE_API_KEY";
pub const API_KEY_FILE_ENV: &str = "OPENAI_COMPATIBLE_API_KEY_FILE";

/// Confidence assigned when the backend does not report one
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which text-generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenaiCompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Ollama => "ollama",
            BackendKind::OpenaiCompatible => "openai_compatible",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(BackendKind::OpenaiCompatible)
            }
            "mock" => Ok(BackendKind::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

/// Where an API key was obtained from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySource {
    Env,
    SecretStore,
}

/// A resolved API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyConfig {
    pub api_key: String,
    pub source: KeySource,
}

impl fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("api_key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// AI backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub backend: BackendKind,
    pub host: Option<String>,
    pub model: Option<String>,
    /// Name of the env var holding the API key
    pub api_key_env: Option<String>,
    /// Path of a secret file holding the API key
    pub api_key_file: Option<PathBuf>,
    pub default_confidence: f64,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            host: None,
            model: None,
            api_key_env: None,
            api_key_file: None,
            default_confidence: DEFAULT_CONFIDENCE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AiConfig {
    /// Build configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_backend_override(&env_lookup)?;
        config.fill_from(&env_lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file, filling unset fields from the environment
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&content)?;
        config.fill_from(&env_lookup);
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration from an explicit path, the default path, or env
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(default) if default.exists() => {
                tracing::debug!(path = %default.display(), "Loading AI config");
                Self::load(&default)
            }
            _ => Self::from_env(),
        }
    }

    /// Parse TOML without consulting the environment
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Whether enough is configured to build a client
    pub fn is_configured(&self) -> bool {
        self.backend == BackendKind::Mock || self.host.is_some()
    }

    /// Resolve the API key, preferring the secret file over the environment
    pub fn api_key(&self) -> Result<Option<ApiKeyConfig>> {
        self.api_key_with(&env_lookup)
    }

    fn api_key_with(&self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Option<ApiKeyConfig>> {
        if let Some(ref path) = self.api_key_file {
            let key = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read API key file {}: {}", path.display(), e))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::Config(format!(
                    "API key file {} is empty",
                    path.display()
                )));
            }
            return Ok(Some(ApiKeyConfig {
                api_key: key.to_string(),
                source: KeySource::SecretStore,
            }));
        }

        let var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        Ok(lookup(var)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|api_key| ApiKeyConfig {
                api_key,
                source: KeySource::Env,
            }))
    }

    /// Select the backend named by `BRIEF_AI_BACKEND`, if set
    fn apply_backend_override(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(BACKEND_ENV) {
            self.backend = raw.parse().map_err(Error::Config)?;
        }
        Ok(())
    }

    /// Fill unset fields from a variable lookup
    fn fill_from(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        let (host_var, model_var, default_model) = match self.backend {
            BackendKind::Ollama => ("OLLAMA_HOST", "OLLAMA_MODEL", "llama3.2"),
            BackendKind::OpenaiCompatible => (
                "OPENAI_COMPATIBLE_HOST",
                "OPENAI_COMPATIBLE_MODEL",
                "gpt-4o-mini",
            ),
            BackendKind::Mock => return,
        };

        if self.host.is_none() {
            self.host = lookup(host_var);
        }
        if self.model.is_none() {
            self.model = Some(lookup(model_var).unwrap_or_else(|| default_model.to_string()));
        }
        if self.api_key_file.is_none() {
            self.api_key_file = lookup(API_KEY_FILE_ENV).map(PathBuf::from);
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(Error::Config(format!(
                "default_confidence must be between 0 and 1, got {}",
                self.default_confidence
            )));
        }
        Ok(())
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("brief").join("config.toml"))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_toml() {
        let config = AiConfig::parse(
            r#"
            backend = "openai_compatible"
            host = "http://localhost:8000"
            model = "llama-3.2"
            default_confidence = 0.7
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::OpenaiCompatible);
        assert_eq!(config.host.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.default_confidence, 0.7);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_rejects_unknown_backend() {
        assert!(matches!(
            AiConfig::parse(r#"backend = "cloud""#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_fill_from_env_for_ollama() {
        let lookup = lookup_from(&[("OLLAMA_HOST", "http://gpu-box:11434")]);
        let mut config = AiConfig::default();
        config.fill_from(&lookup);

        assert_eq!(config.host.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.model.as_deref(), Some("llama3.2"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_file_values_win_over_env() {
        let lookup = lookup_from(&[("OLLAMA_HOST", "http://env"), ("OLLAMA_MODEL", "env-model")]);
        let mut config = AiConfig {
            host: Some("http://file".to_string()),
            ..Default::default()
        };
        config.fill_from(&lookup);

        assert_eq!(config.host.as_deref(), Some("http://file"));
        assert_eq!(config.model.as_deref(), Some("env-model"));
    }

    #[test]
    fn test_backend_override() {
        let lookup = lookup_from(&[(BACKEND_ENV, "vllm")]);
        let mut config = AiConfig::default();
        config.apply_backend_override(&lookup).unwrap();
        assert_eq!(config.backend, BackendKind::OpenaiCompatible);

        // Unset leaves the current backend alone
        config.apply_backend_override(&lookup_from(&[])).unwrap();
        assert_eq!(config.backend, BackendKind::OpenaiCompatible);

        let bad = lookup_from(&[(BACKEND_ENV, "nope")]);
        assert!(config.apply_backend_override(&bad).is_err());
    }

    #[test]
    fn test_unconfigured_without_host() {
        let config = AiConfig::default();
        assert!(!config.is_configured());

        let mock = AiConfig {
            backend: BackendKind::Mock,
            ..Default::default()
        };
        assert!(mock.is_configured());
    }

    #[test]
    fn test_api_key_from_env() {
        let lookup = lookup_from(&[(DEFAULT_API_KEY_ENV, "sk-test ")]);
        let key = AiConfig::default().api_key_with(&lookup).unwrap().unwrap();

        assert_eq!(key.api_key, "sk-test");
        assert_eq!(key.source, KeySource::Env);
        assert!(!format!("{:?}", key).contains("sk-test"));
    }

    #[test]
    fn test_api_key_from_named_env_var() {
        let lookup = lookup_from(&[("MY_LLM_KEY", "sk-named")]);
        let config = AiConfig {
            api_key_env: Some("MY_LLM_KEY".to_string()),
            ..Default::default()
        };
        let key = config.api_key_with(&lookup).unwrap().unwrap();
        assert_eq!(key.api_key, "sk-named");
    }

    #[test]
    fn test_api_key_from_secret_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sk-secret").unwrap();

        let config = AiConfig {
            api_key_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let lookup = lookup_from(&[(DEFAULT_API_KEY_ENV, "sk-env")]);
        let key = config.api_key_with(&lookup).unwrap().unwrap();

        assert_eq!(key.api_key, "sk-secret");
        assert_eq!(key.source, KeySource::SecretStore);
    }

    #[test]
    fn test_missing_secret_file_is_an_error() {
        let config = AiConfig {
            api_key_file: Some(PathBuf::from("/nonexistent/brief/key")),
            ..Default::default()
        };
        assert!(matches!(config.api_key(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_confidence_range() {
        let config = AiConfig {
            default_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"mock\"\ndefault_confidence = 0.6").unwrap();

        let config = AiConfig::load(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Mock);
        assert_eq!(config.default_confidence, 0.6);
    }
}
