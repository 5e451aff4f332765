//! Provider key value object

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The providers a message is fanned out to (Value Object)
///
/// The set is closed: every aggregate result carries exactly the keys of the
/// configured providers, and the wire format uses the lowercase key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKey {
    Gemini,
    Groq,
    OpenRouter,
    Qwen,
}

impl ProviderKey {
    /// All providers, in display order
    pub const ALL: [ProviderKey; 4] = [
        ProviderKey::Gemini,
        ProviderKey::Groq,
        ProviderKey::OpenRouter,
        ProviderKey::Qwen,
    ];

    /// Wire identifier (`gemini`, `groq`, `openrouter`, `qwen`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKey::Gemini => "gemini",
            ProviderKey::Groq => "groq",
            ProviderKey::OpenRouter => "openrouter",
            ProviderKey::Qwen => "qwen",
        }
    }

    /// Human-readable provider name, used as the prefix of error strings
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKey::Gemini => "Gemini",
            ProviderKey::Groq => "Groq",
            ProviderKey::OpenRouter => "OpenRouter",
            ProviderKey::Qwen => "Qwen",
        }
    }
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(ProviderKey::Gemini),
            "groq" => Ok(ProviderKey::Groq),
            "openrouter" => Ok(ProviderKey::OpenRouter),
            "qwen" => Ok(ProviderKey::Qwen),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for ProviderKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
