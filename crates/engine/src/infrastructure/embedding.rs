//! Ollama embedding client (`POST /api/embed`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::ports::{EmbeddingError, EmbeddingPort};

/// Client for Ollama's native embedding API.
#[derive(Clone)]
pub struct OllamaEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        // Model loading can stall the first request
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingPort for OllamaEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;
            return Err(EmbeddingError::RequestFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        first_embedding(body)
    }
}

fn first_embedding(body: EmbedResponse) -> Result<Vec<f32>, EmbeddingError> {
    let vector = body
        .embeddings
        .into_iter()
        .next()
        .ok_or_else(|| EmbeddingError::InvalidResponse("no embeddings returned".to_string()))?;
    if vector.is_empty() {
        return Err(EmbeddingError::InvalidResponse(
            "empty embedding vector".to_string(),
        ));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<f32>, EmbeddingError> {
        first_embedding(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn takes_first_vector() {
        let vector = parse(r#"{"model":"m","embeddings":[[0.5,-0.25],[1.0,1.0]]}"#).unwrap();
        assert_eq!(vector, vec![0.5, -0.25]);
    }

    #[test]
    fn missing_embeddings_is_invalid() {
        assert!(matches!(
            parse(r#"{"model":"m"}"#),
            Err(EmbeddingError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse(r#"{"embeddings":[[]]}"#),
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OllamaEmbeddingClient::new("http://localhost:11434/", "nomic-embed-text");
        assert_eq!(client.base_url, "http://localhost:11434");
    }
}
