use crate::domain::ports::TextGenerator;
use crate::utils::error::{BlueBlissError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// 本地 LLM 推論伺服器（Ollama `/api/generate` 相容）
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        tracing::debug!("Requesting completion from {} (model: {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlueBlissError::UpstreamError {
                message: format!("LLM server returned {}", status),
            });
        }

        let body: GenerateResponse = response.json().await?;
        let text = body.response.trim().to_string();
        if text.is_empty() {
            return Err(BlueBlissError::UpstreamError {
                message: "LLM server returned an empty response".to_string(),
            });
        }

        Ok(text)
    }
}

/// 未設定 LLM 時使用的固定回覆
pub struct TemplateGenerator;

pub const TEMPLATE_REPLY: &str =
    "Thanks for chatting with BlueBliss! Browse our combos for the best deals across all three kitchens.";

#[async_trait]
impl TextGenerator for TemplateGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(TEMPLATE_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(&server.base_url(), "llama3", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_successful_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model": "llama3", "stream": false}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"model": "llama3", "response": "  Grab the feast and save 157!  ", "done": true}));
        });

        let text = client_for(&server).generate("upsell please").await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Grab the feast and save 157!");
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500);
        });

        let err = client_for(&server).generate("hello").await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, BlueBlissError::UpstreamError { .. }));
    }

    #[tokio::test]
    async fn test_generate_empty_response_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({"response": "   "}));
        });

        assert!(client_for(&server).generate("hello").await.is_err());
    }

    #[test]
    fn test_template_generator() {
        let text = tokio_test::block_on(TemplateGenerator.generate("anything")).unwrap();
        assert_eq!(text, TEMPLATE_REPLY);
    }
}
