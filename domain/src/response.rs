//! Aggregate response value objects.
//!
//! - [`ProviderOutcome`] - one provider slot: the model's text or a failure description
//! - [`ProviderResponses`] - fixed-key mapping from provider to outcome
//! - [`ResponseRecord`] - result of one user turn, appended to a chat
//!
//! # Wire format
//!
//! A record travels as a flat JSON object. Per-provider results are plain
//! strings, failures included, so a client can render every slot the same
//! way:
//!
//! ```json
//! { "gemini": "Hi there!", "groq": "Groq error: API key is not configured" }
//! ```
//!
//! A call that failed before any provider was reached carries a single
//! top-level `error` field instead:
//!
//! ```json
//! { "error": "Conversation must contain at least one message" }
//! ```

use crate::core::provider::ProviderKey;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Outcome of one provider invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The model's complete answer
    Success(String),
    /// A displayable failure description (`"<Provider> error: <reason>"`)
    Failure(String),
}

impl ProviderOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        ProviderOutcome::Success(text.into())
    }

    /// Build a failure scoped to a provider, prefixed with its name.
    pub fn failure(key: ProviderKey, reason: impl std::fmt::Display) -> Self {
        ProviderOutcome::Failure(format!("{} error: {}", key.display_name(), reason))
    }

    /// Recover the typed outcome from its wire string.
    ///
    /// Failures are recognised by the provider-scoped prefix every adapter
    /// writes. The wire carries no other marker, so a successful answer that
    /// itself starts with `"<Provider> error:"` decodes as a failure.
    pub fn from_wire(key: ProviderKey, text: String) -> Self {
        let prefix = format!("{} error:", key.display_name());
        if text.starts_with(&prefix) {
            ProviderOutcome::Failure(text)
        } else {
            ProviderOutcome::Success(text)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }

    /// Displayable text of either variant
    pub fn as_text(&self) -> &str {
        match self {
            ProviderOutcome::Success(text) | ProviderOutcome::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ProviderOutcome::Success(text) | ProviderOutcome::Failure(text) => text,
        }
    }
}

/// Fixed-key mapping from provider to outcome
///
/// Built through [`ProviderResponses::complete`], which guarantees that the
/// key set equals the set of providers that were asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponses {
    outcomes: BTreeMap<ProviderKey, ProviderOutcome>,
}

impl ProviderResponses {
    /// Gather outcomes for `expected` providers.
    ///
    /// Any expected provider missing from `outcomes` gets a failure slot;
    /// outcomes for providers that were not expected are dropped.
    pub fn complete(
        expected: &[ProviderKey],
        mut outcomes: BTreeMap<ProviderKey, ProviderOutcome>,
    ) -> Self {
        let outcomes = expected
            .iter()
            .map(|key| {
                let outcome = outcomes
                    .remove(key)
                    .unwrap_or_else(|| ProviderOutcome::failure(*key, "no response"));
                (*key, outcome)
            })
            .collect();
        Self { outcomes }
    }

    pub fn get(&self, key: ProviderKey) -> Option<&ProviderOutcome> {
        self.outcomes.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ProviderKey> + '_ {
        self.outcomes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderKey, &ProviderOutcome)> + '_ {
        self.outcomes.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of providers that answered
    pub fn successes(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    /// Number of providers that failed
    pub fn failures(&self) -> usize {
        self.len() - self.successes()
    }
}

/// The result of one user turn (immutable once appended to a chat)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseRecord {
    /// Every asked provider, each with its own outcome
    Providers(ProviderResponses),
    /// The whole call failed before any provider was reached
    Error(String),
}

impl ResponseRecord {
    pub fn error(message: impl Into<String>) -> Self {
        ResponseRecord::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseRecord::Error(_))
    }

    pub fn providers(&self) -> Option<&ProviderResponses> {
        match self {
            ResponseRecord::Providers(responses) => Some(responses),
            ResponseRecord::Error(_) => None,
        }
    }

    /// Text to show in a provider's column: its own outcome, or the
    /// top-level error when the whole call failed.
    pub fn text_for(&self, key: ProviderKey) -> Option<&str> {
        match self {
            ResponseRecord::Providers(responses) => responses.get(key).map(|o| o.as_text()),
            ResponseRecord::Error(message) => Some(message),
        }
    }
}

impl From<ProviderResponses> for ResponseRecord {
    fn from(responses: ProviderResponses) -> Self {
        ResponseRecord::Providers(responses)
    }
}

impl Serialize for ResponseRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ResponseRecord::Providers(responses) => {
                let mut map = serializer.serialize_map(Some(responses.len()))?;
                for (key, outcome) in responses.iter() {
                    map.serialize_entry(key.as_str(), outcome.as_text())?;
                }
                map.end()
            }
            ResponseRecord::Error(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ResponseRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;

        if let Some(message) = raw.get("error") {
            if raw.len() == 1 {
                return Ok(ResponseRecord::Error(message.clone()));
            }
            return Err(D::Error::custom(
                "`error` cannot be combined with provider keys",
            ));
        }

        let mut outcomes = BTreeMap::new();
        for (name, text) in raw {
            let key: ProviderKey = name.parse().map_err(D::Error::custom)?;
            outcomes.insert(key, ProviderOutcome::from_wire(key, text));
        }
        let expected: Vec<_> = outcomes.keys().copied().collect();
        Ok(ResponseRecord::Providers(ProviderResponses::complete(
            &expected, outcomes,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProviderResponses {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ProviderKey::Gemini, ProviderOutcome::success("Hi"));
        outcomes.insert(
            ProviderKey::Groq,
            ProviderOutcome::failure(ProviderKey::Groq, "API key is not configured"),
        );
        ProviderResponses::complete(&[ProviderKey::Gemini, ProviderKey::Groq], outcomes)
    }

    #[test]
    fn failure_is_prefixed_with_provider_name() {
        let outcome = ProviderOutcome::failure(ProviderKey::OpenRouter, "HTTP 502");
        assert_eq!(outcome.as_text(), "OpenRouter error: HTTP 502");
        assert!(!outcome.is_success());
    }

    #[test]
    fn from_wire_classifies_by_own_prefix_only() {
        let failure = ProviderOutcome::from_wire(ProviderKey::Groq, "Groq error: HTTP 429".into());
        assert!(!failure.is_success());

        let other_prefix =
            ProviderOutcome::from_wire(ProviderKey::Groq, "Gemini error: quoted text".into());
        assert!(other_prefix.is_success());

        // Indistinguishable from a real failure on the wire
        let lookalike =
            ProviderOutcome::from_wire(ProviderKey::Gemini, "Gemini error: is a phrase".into());
        assert!(!lookalike.is_success());
    }

    #[test]
    fn complete_fills_missing_keys() {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ProviderKey::Gemini, ProviderOutcome::success("ok"));
        // Not expected, dropped
        outcomes.insert(ProviderKey::Qwen, ProviderOutcome::success("extra"));

        let responses = ProviderResponses::complete(
            &[ProviderKey::Gemini, ProviderKey::OpenRouter],
            outcomes,
        );

        let keys: Vec<_> = responses.keys().collect();
        assert_eq!(keys, vec![ProviderKey::Gemini, ProviderKey::OpenRouter]);
        assert_eq!(responses.successes(), 1);
        assert_eq!(responses.failures(), 1);
        assert_eq!(
            responses.get(ProviderKey::OpenRouter).unwrap().as_text(),
            "OpenRouter error: no response"
        );
    }

    #[test]
    fn record_serializes_as_flat_object() {
        let record = ResponseRecord::from(sample());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "gemini": "Hi",
                "groq": "Groq error: API key is not configured",
            })
        );

        let error = ResponseRecord::error("Internal server error");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            serde_json::json!({ "error": "Internal server error" })
        );
    }

    #[test]
    fn record_deserialize_recovers_failures() {
        let record: ResponseRecord = serde_json::from_value(serde_json::json!({
            "gemini": "Hi",
            "groq": "Groq error: API key is not configured",
        }))
        .unwrap();
        assert_eq!(record, ResponseRecord::from(sample()));

        let error: ResponseRecord =
            serde_json::from_value(serde_json::json!({ "error": "boom" })).unwrap();
        assert_eq!(error, ResponseRecord::error("boom"));
    }

    #[test]
    fn record_deserialize_rejects_unknown_provider() {
        let result: Result<ResponseRecord, _> =
            serde_json::from_value(serde_json::json!({ "claude": "Hi" }));
        assert!(result.is_err());
    }

    #[test]
    fn text_for_falls_back_to_top_level_error() {
        let record = ResponseRecord::from(sample());
        assert_eq!(record.text_for(ProviderKey::Gemini), Some("Hi"));
        assert_eq!(record.text_for(ProviderKey::Qwen), None);

        let error = ResponseRecord::error("boom");
        assert_eq!(error.text_for(ProviderKey::Qwen), Some("boom"));
    }
}
