//! Provider configuration from TOML (`[providers]` section)

use fiesta_domain::ProviderKey;
use serde::{Deserialize, Serialize};

/// Google Gemini settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

/// Groq (OpenAI-compatible) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGroqConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "GROQ_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for FileGroqConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "GROQ_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

/// OpenRouter settings, shared by every OpenRouter-hosted slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    pub enabled: bool,
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the site URL sent as `HTTP-Referer`.
    pub referer_env: String,
    /// `HTTP-Referer` used when `referer_env` is unset.
    pub default_referer: String,
    /// Sent as `X-Title`.
    pub title: String,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "deepseek/deepseek-chat-v3-0324:free".to_string(),
            referer_env: "DOMAIN".to_string(),
            default_referer: "http://localhost:3000".to_string(),
            title: "app-fiesta".to_string(),
        }
    }
}

impl FileOpenRouterConfig {
    /// Referer from the environment, falling back to the configured default.
    pub fn resolve_referer(&self) -> String {
        std::env::var(&self.referer_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.default_referer.clone())
    }
}

/// Qwen slot. Served through OpenRouter with its credentials and headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQwenConfig {
    pub enabled: bool,
    pub model: String,
}

impl Default for FileQwenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "qwen/qwen3-coder:free".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Request timeout applied to every provider call, in seconds.
    pub timeout_secs: u64,
    pub gemini: FileGeminiConfig,
    pub groq: FileGroqConfig,
    pub openrouter: FileOpenRouterConfig,
    pub qwen: FileQwenConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            gemini: FileGeminiConfig::default(),
            groq: FileGroqConfig::default(),
            openrouter: FileOpenRouterConfig::default(),
            qwen: FileQwenConfig::default(),
        }
    }
}

impl FileProvidersConfig {
    pub fn is_enabled(&self, key: ProviderKey) -> bool {
        match key {
            ProviderKey::Gemini => self.gemini.enabled,
            ProviderKey::Groq => self.groq.enabled,
            ProviderKey::OpenRouter => self.openrouter.enabled,
            ProviderKey::Qwen => self.qwen.enabled,
        }
    }

    /// Upstream model id configured for a provider slot
    pub fn model_for(&self, key: ProviderKey) -> &str {
        match key {
            ProviderKey::Gemini => &self.gemini.model,
            ProviderKey::Groq => &self.groq.model,
            ProviderKey::OpenRouter => &self.openrouter.model,
            ProviderKey::Qwen => &self.qwen.model,
        }
    }

    /// Keys of the enabled providers, in reporting order
    pub fn enabled_keys(&self) -> Vec<ProviderKey> {
        ProviderKey::ALL
            .iter()
            .copied()
            .filter(|key| self.is_enabled(*key))
            .collect()
    }
}
