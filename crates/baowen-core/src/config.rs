use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider selection: "auto", "deepseek", "openai"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key shared by both providers (env OPENAI_API_KEY overrides)
    #[serde(default)]
    pub api_key: Option<String>,
    /// DeepSeek model name
    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,
    /// OpenAI model name
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature for article generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Max completion tokens when calling DeepSeek
    #[serde(default = "default_deepseek_max_tokens")]
    pub deepseek_max_tokens: u32,
    /// Max completion tokens when calling OpenAI
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Per-call request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            deepseek_model: default_deepseek_model(),
            openai_model: default_openai_model(),
            temperature: default_temperature(),
            deepseek_max_tokens: default_deepseek_max_tokens(),
            openai_max_tokens: default_openai_max_tokens(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_provider() -> String {
    "auto".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_deepseek_max_tokens() -> u32 {
    3000
}

fn default_openai_max_tokens() -> u32 {
    2500
}

fn default_request_timeout() -> u64 {
    100
}

impl AppConfig {
    /// Load configuration from the default path or return defaults,
    /// then apply environment overrides.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables take precedence over the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.ai.api_key = Some(key);
            }
        }
        if let Ok(provider) = std::env::var("API_PROVIDER") {
            if !provider.trim().is_empty() {
                self.ai.provider = provider.to_lowercase();
            }
        }
    }

    /// Get the configuration file path
    /// Always uses ~/.config/baowen/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("baowen")
            .join("config.toml")
    }
}
