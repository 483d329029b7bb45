use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const URL: &str = "http://localhost:11434/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_TEMP: f64 = 0.0;
const DEFAULT_TOKENS: usize = 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Overrides `api_url` when set
pub const API_URL_ENV_VAR: &str = "TOOLFRAME_API_URL";
/// Overrides `model` when set
pub const MODEL_ENV_VAR: &str = "TOOLFRAME_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to deserialize json config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to fetch env var `{0}`")]
    MissingEnvVar(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Connection and sampling settings for a chat-completions backend.
///
/// Every field may be left out of the JSON form; missing ones take the
/// defaults of a local Ollama install.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub api_url: String,
    pub model: String,
    /// Name of the env var holding a bearer token. Local runtimes need none.
    pub api_key_var: Option<String>,
    pub temperature: f64,
    pub max_tokens: usize,
    pub system_prompt: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_var: None,
            temperature: DEFAULT_TEMP,
            max_tokens: DEFAULT_TOKENS,
            system_prompt: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Applies [`API_URL_ENV_VAR`] and [`MODEL_ENV_VAR`] if they are set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            self.api_url = url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            self.model = model;
        }
        self
    }

    /// Reads the bearer token named by `api_key_var`, if one is configured
    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        match &self.api_key_var {
            None => Ok(None),
            Some(var) => std::env::var(var)
                .map(Some)
                .map_err(|_| ConfigError::MissingEnvVar(var.clone())),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Whether the dispatcher awaits invocations one by one or all together.
/// Results come back in request order either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    pub mode: ExecutionMode,
    /// Upper bound for a single tool invocation
    pub invocation_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound for the gateway round trip
    pub gateway_timeout: Option<Duration>,
    pub dispatch: DispatchConfig,
}
