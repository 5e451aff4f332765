//! OpenRouter adapter (streamed chat completions).
//!
//! The SSE stream is read to the end and returned as one answer. The same
//! adapter serves every OpenRouter-hosted slot (`openrouter`, `qwen`); only
//! the reported key and the model differ.

use super::chat_completions::{ChatCompletionRequest, StreamCollector};
use super::http::{Credential, bearer_headers, check_status, transport};
use crate::config::FileOpenRouterConfig;
use async_trait::async_trait;
use fiesta_application::{ProviderAdapter, ProviderError};
use fiesta_domain::{Conversation, ProviderKey, ProviderOutcome};
use futures::StreamExt;
use reqwest::header::HeaderValue;
use tracing::{debug, warn};

pub struct OpenRouterAdapter {
    key: ProviderKey,
    client: reqwest::Client,
    credential: Credential,
    base_url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterAdapter {
    pub fn new(
        key: ProviderKey,
        client: reqwest::Client,
        config: &FileOpenRouterConfig,
        model: impl Into<String>,
    ) -> Self {
        Self {
            key,
            client,
            credential: Credential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            referer: config.resolve_referer(),
            title: config.title.clone(),
        }
    }

    async fn stream(&self, conversation: &Conversation) -> Result<String, ProviderError> {
        let api_key = self.credential.resolve()?;
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: conversation.messages(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            stream: true,
        };

        let mut headers = bearer_headers(&api_key);
        if let Ok(val) = HeaderValue::from_str(&self.referer) {
            headers.insert("http-referer", val);
        }
        if let Ok(val) = HeaderValue::from_str(&self.title) {
            headers.insert("x-title", val);
        }

        debug!("OpenRouter request: key={}, model={}", self.key, self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let mut collector = StreamCollector::default();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport)?;
            if collector.push(&chunk)? {
                break;
            }
        }
        collector.finish()
    }
}

#[async_trait]
impl ProviderAdapter for OpenRouterAdapter {
    fn key(&self) -> ProviderKey {
        self.key
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn respond(&self, conversation: &Conversation) -> ProviderOutcome {
        match self.stream(conversation).await {
            Ok(text) => ProviderOutcome::success(text),
            Err(e) => {
                warn!("OpenRouter request for {} failed: {}", self.key, e);
                e.into_outcome(self.key)
            }
        }
    }
}
