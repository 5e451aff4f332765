//! Google Gemini adapter (`generateContent`).
//!
//! Only the latest user turn is sent, as a single text part.

use super::http::{Credential, check_status, malformed, transport};
use crate::config::FileGeminiConfig;
use async_trait::async_trait;
use fiesta_application::{ProviderAdapter, ProviderError};
use fiesta_domain::{Conversation, ProviderKey, ProviderOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiAdapter {
    client: reqwest::Client,
    credential: Credential,
    base_url: String,
    model: String,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, config: &FileGeminiConfig) -> Self {
        Self {
            client,
            credential: Credential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    async fn generate(&self, conversation: &Conversation) -> Result<String, ProviderError> {
        let api_key = self.credential.resolve()?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: conversation.last_user_message(),
                }],
            }],
        };

        debug!("Gemini request: model={}", self.model);
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let payload: GenerateContentResponse = response.json().await.map_err(malformed)?;
        payload.into_text()
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn key(&self) -> ProviderKey {
        ProviderKey::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn respond(&self, conversation: &Conversation) -> ProviderOutcome {
        match self.generate(conversation).await {
            Ok(text) => ProviderOutcome::success(text),
            Err(e) => {
                warn!("Gemini request failed: {}", e);
                e.into_outcome(self.key())
            }
        }
    }
}

// -- Wire types -----------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, ProviderError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::Upstream(format!("prompt blocked ({reason})")));
        }
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}
