//! Groq adapter (OpenAI-compatible chat completions, non-streaming).

use super::chat_completions::{ChatCompletionRequest, ChatCompletionResponse};
use super::http::{Credential, bearer_headers, check_status, malformed, transport};
use crate::config::FileGroqConfig;
use async_trait::async_trait;
use fiesta_application::{ProviderAdapter, ProviderError};
use fiesta_domain::{Conversation, ProviderKey, ProviderOutcome};
use tracing::{debug, warn};

/// Answer reported when Groq returns no choice content
pub const NO_RESPONSE: &str = "No response from Groq";

pub struct GroqAdapter {
    client: reqwest::Client,
    credential: Credential,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

impl GroqAdapter {
    pub fn new(client: reqwest::Client, config: &FileGroqConfig) -> Self {
        Self {
            client,
            credential: Credential::new(&config.api_key_env, config.api_key.clone()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        }
    }

    async fn complete(&self, conversation: &Conversation) -> Result<String, ProviderError> {
        let api_key = self.credential.resolve()?;
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: conversation.messages(),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            top_p: Some(self.top_p),
            stream: false,
        };

        debug!(
            "Groq request: model={}, {} messages",
            self.model,
            conversation.len()
        );
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(bearer_headers(&api_key))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        let payload: ChatCompletionResponse = response.json().await.map_err(malformed)?;

        Ok(payload
            .first_content()
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

#[async_trait]
impl ProviderAdapter for GroqAdapter {
    fn key(&self) -> ProviderKey {
        ProviderKey::Groq
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn respond(&self, conversation: &Conversation) -> ProviderOutcome {
        match self.complete(conversation).await {
            Ok(text) => ProviderOutcome::success(text),
            Err(e) => {
                warn!("Groq request failed: {}", e);
                e.into_outcome(self.key())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiesta_domain::Message;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> GroqAdapter {
        let config = FileGroqConfig {
            api_key: Some("gsk-test".to_string()),
            base_url: server.uri(),
            ..Default::default()
        };
        GroqAdapter::new(reqwest::Client::new(), &config)
    }

    #[tokio::test]
    async fn forwards_every_turn_with_sampling_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer gsk-test"))
            .and(body_partial_json(json!({
                "model": "mixtral-8x7b-32768",
                "temperature": 1.0,
                "max_tokens": 1024,
                "top_p": 1.0,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hey!"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let conversation =
            Conversation::new(vec![Message::system("be brief"), Message::user("Hello")]).unwrap();
        let outcome = adapter(&server).respond(&conversation).await;
        assert_eq!(outcome, ProviderOutcome::success("Hey!"));
    }

    #[tokio::test]
    async fn empty_choices_yield_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let conversation = Conversation::from_user_input("Hello").unwrap();
        let outcome = adapter(&server).respond(&conversation).await;
        assert_eq!(outcome, ProviderOutcome::success(NO_RESPONSE));
    }

    #[tokio::test]
    async fn rate_limit_becomes_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached", "type": "tokens"}
            })))
            .mount(&server)
            .await;

        let conversation = Conversation::from_user_input("Hello").unwrap();
        let outcome = adapter(&server).respond(&conversation).await;
        assert_eq!(
            outcome,
            ProviderOutcome::Failure("Groq error: HTTP 429: Rate limit reached".to_string())
        );
    }

    #[tokio::test]
    async fn invalid_json_becomes_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let conversation = Conversation::from_user_input("Hello").unwrap();
        let outcome = adapter(&server).respond(&conversation).await;
        assert!(outcome.as_text().starts_with("Groq error: malformed response"));
    }
}
