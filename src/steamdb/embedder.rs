//! Embedding generation via an Ollama-compatible embedding endpoint
//!
//! Endpoint: POST {host}/api/embeddings with `{model, prompt}`, answering
//! `{embedding: [f32]}`.

use crate::errors::{AgentError, Result};
use crate::tools::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Attempts per embedding request before giving up
const EMBED_ATTEMPTS: u32 = 3;

/// Base backoff between attempts
const EMBED_BACKOFF: Duration = Duration::from_millis(250);

/// Text to vector seam; implementations return raw (unnormalized) vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Scale a vector to unit length; zero vectors are left untouched
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Embedding client for an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OllamaEmbedder {
    /// Create embedder with custom configuration
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AgentError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            retry: RetryPolicy::new(EMBED_ATTEMPTS, EMBED_BACKOFF),
        })
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AgentError::EmbeddingServiceError(format!("Failed to send request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::EmbeddingServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            AgentError::EmbeddingServiceError(format!("Failed to parse embedding: {}", e))
        })?;

        if body.embedding.is_empty() {
            return Err(AgentError::EmbeddingServiceError(
                "Embedding service returned an empty vector".to_string(),
            ));
        }

        debug!(dimension = body.embedding.len(), "Received embedding");
        Ok(body.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.retry.run(|| self.embed_once(text)).await
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OllamaEmbedder::with_config(
            "http://localhost:11434/",
            "mxbai-embed-large",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(embedder.model(), "mxbai-embed-large");
        assert_eq!(embedder.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_normalize_unit_length() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_embedding_error() {
        let embedder = OllamaEmbedder {
            retry: RetryPolicy::none(),
            ..OllamaEmbedder::with_config("http://127.0.0.1:9", "m", Duration::from_millis(200))
                .unwrap()
        };
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::EmbeddingServiceError(_)));
    }
}
