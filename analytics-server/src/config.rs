//! Configuration module

use std::env;
use std::path::PathBuf;

use pnode_analytics_core::constants::{
    DEFAULT_DATA_PATH, DEFAULT_GROQ_API_URL, DEFAULT_GROQ_MODEL, DEFAULT_LLM_TIMEOUT_SECS,
};
use pnode_analytics_core::LlmSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("STATIC_DIR '{0}' does not exist or is not a directory")]
    StaticDirMissing(PathBuf),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,
    pub port: u16,

    /// Metric history CSV
    pub data_path: PathBuf,

    /// Frontend build to serve as fallback route. Unset = no assets.
    pub static_dir: Option<PathBuf>,

    /// Groq credential. Unset = offline (rule-based) chat.
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_api_url: String,

    /// LLM request timeout in seconds
    pub llm_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            static_dir: None,
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            data_path: get("DATA_PATH").map(PathBuf::from).unwrap_or(defaults.data_path),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_api_url: get("GROQ_API_URL").unwrap_or(defaults.groq_api_url),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS"), defaults.llm_timeout_secs)?,
        })
    }

    /// Reject a STATIC_DIR that is set but not an existing directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.static_dir {
            Some(dir) if !dir.is_dir() => Err(ConfigError::StaticDirMissing(dir.clone())),
            _ => Ok(()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// LLM settings, present only when a credential is configured
    pub fn llm_settings(&self) -> Option<LlmSettings> {
        self.groq_api_key.as_ref().map(|key| LlmSettings {
            model: self.groq_model.clone(),
            base_url: self.groq_api_url.clone(),
            timeout_seconds: self.llm_timeout_secs,
            ..LlmSettings::new(key.clone())
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
