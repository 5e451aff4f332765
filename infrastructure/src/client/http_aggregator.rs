//! [`Aggregator`] over HTTP (`POST /api/chat`).

use async_trait::async_trait;
use fiesta_application::{Aggregator, ProgressNotifier};
use fiesta_domain::{Conversation, ProviderKey, ResponseRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    messages: &'a Conversation,
}

#[derive(Deserialize)]
struct HealthBody {
    providers: Vec<ProviderKey>,
}

pub struct HttpAggregatorClient {
    client: reqwest::Client,
    endpoint: String,
    providers: Vec<ProviderKey>,
}

impl HttpAggregatorClient {
    /// Client for `endpoint` (e.g. `http://127.0.0.1:3000`) assuming every provider
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            providers: ProviderKey::ALL.to_vec(),
        }
    }

    /// Ask the server's `/health` which providers it runs.
    ///
    /// Keeps the full provider list when the server cannot be reached; the
    /// first send will then report the connection problem.
    pub async fn connect(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        let mut this = Self::new(client, endpoint);
        match this.fetch_providers().await {
            Ok(providers) => this.providers = providers,
            Err(e) => warn!("Could not query {}/health: {}", this.endpoint, e),
        }
        this
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_providers(&self) -> Result<Vec<ProviderKey>, reqwest::Error> {
        let health: HealthBody = self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(health.providers)
    }

    async fn post(&self, conversation: &Conversation) -> ResponseRecord {
        let url = format!("{}/api/chat", self.endpoint);
        debug!("POST {} ({} messages)", url, conversation.len());

        let response = match self
            .client
            .post(&url)
            .json(&ChatRequestBody {
                messages: conversation,
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ResponseRecord::error(format!("Could not reach {}: {}", url, e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ResponseRecord::error(format!("Failed to read response: {}", e)),
        };

        match serde_json::from_str::<ResponseRecord>(&body) {
            Ok(record) => record,
            Err(e) if status.is_success() => {
                ResponseRecord::error(format!("Malformed response from server: {}", e))
            }
            Err(_) => ResponseRecord::error(format!("Server returned HTTP {}", status.as_u16())),
        }
    }
}

#[async_trait]
impl Aggregator for HttpAggregatorClient {
    fn providers(&self) -> Vec<ProviderKey> {
        self.providers.clone()
    }

    async fn aggregate_with_progress(
        &self,
        conversation: &Conversation,
        progress: &dyn ProgressNotifier,
    ) -> ResponseRecord {
        progress.on_dispatch(&self.providers);
        let record = self.post(conversation).await;

        if let Some(responses) = record.providers() {
            for (key, outcome) in responses.iter() {
                progress.on_provider_complete(key, outcome.is_success());
            }
        }
        progress.on_complete();
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiesta_domain::ProviderOutcome;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn decodes_provider_map() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "gemini": "Hi!",
                "groq": "Groq error: API key is not configured (set GROQ_API_KEY)"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpAggregatorClient::new(reqwest::Client::new(), server.uri());
        let conversation = Conversation::from_user_input("Hello").unwrap();
        let record = client.aggregate(&conversation).await;

        let responses = record.providers().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(
            responses.get(ProviderKey::Gemini),
            Some(&ProviderOutcome::success("Hi!"))
        );
        assert!(!responses.get(ProviderKey::Groq).unwrap().is_success());
    }

    #[tokio::test]
    async fn error_body_becomes_error_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "No providers are configured"
            })))
            .mount(&server)
            .await;

        let client = HttpAggregatorClient::new(reqwest::Client::new(), server.uri());
        let conversation = Conversation::from_user_input("Hello").unwrap();
        assert_eq!(
            client.aggregate(&conversation).await,
            ResponseRecord::error("No providers are configured")
        );
    }

    #[tokio::test]
    async fn non_json_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = HttpAggregatorClient::new(reqwest::Client::new(), server.uri());
        let conversation = Conversation::from_user_input("Hello").unwrap();
        assert_eq!(
            client.aggregate(&conversation).await,
            ResponseRecord::error("Server returned HTTP 502")
        );
    }

    #[tokio::test]
    async fn unreachable_server_becomes_error_record() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = HttpAggregatorClient::new(reqwest::Client::new(), "http://127.0.0.1:9/");
        assert_eq!(client.endpoint(), "http://127.0.0.1:9");
        let conversation = Conversation::from_user_input("Hello").unwrap();
        let record = client.aggregate(&conversation).await;
        assert!(record.is_error());
    }

    #[tokio::test]
    async fn connect_reads_provider_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "providers": ["groq", "qwen"]
            })))
            .mount(&server)
            .await;

        let client = HttpAggregatorClient::connect(reqwest::Client::new(), server.uri()).await;
        assert_eq!(
            client.providers(),
            vec![ProviderKey::Groq, ProviderKey::Qwen]
        );
    }

    #[tokio::test]
    async fn connect_falls_back_to_all_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpAggregatorClient::connect(reqwest::Client::new(), server.uri()).await;
        assert_eq!(client.providers(), ProviderKey::ALL.to_vec());
    }
}
