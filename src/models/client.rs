//! Chat-completion HTTP client
//!
//! Posts `{"model", "messages"}` to the configured endpoint with a bearer
//! token and returns the decoded JSON body unchanged.

use crate::errors::{AgentError, Result};
use crate::models::ChatModel;
use crate::types::ConversationTurn;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationTurn],
}

/// Remote chat model client
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    url: String,
    model: String,
    api_token: String,
}

impl ChatClient {
    pub fn new(url: &str, model: &str, api_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AgentError::HttpError)?;

        Ok(Self {
            client,
            url: url.to_string(),
            model: model.to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<Value> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::ModelServiceError(format!("Request timed out: {}", e))
                } else {
                    AgentError::ModelServiceError(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::ModelServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AgentError::ModelServiceError(format!("Failed to parse response: {}", e))
        })?;
        debug!(model = %self.model, "Received model reply");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let turns = vec![ConversationTurn::system("rules"), ConversationTurn::user("hi")];
        let body = serde_json::to_value(ChatRequest {
            model: "m",
            messages: &turns,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "rules"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ChatClient::new("http://x", "m", "sk-secret", Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_unreachable_is_model_service_error() {
        let client = ChatClient::new(
            "http://127.0.0.1:9/v1/chat/completions",
            "m",
            "t",
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.complete(&[ConversationTurn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, AgentError::ModelServiceError(_)));
        assert!(err.is_retryable());
    }
}
