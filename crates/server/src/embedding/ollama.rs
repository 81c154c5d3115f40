//! Ollama embedding backend.

use super::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
#[serde(untagged)]
enum EmbedRequest<'a> {
    Single { model: &'a str, input: &'a str },
    Batch { model: &'a str, input: &'a [String] },
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    embeddings: Option<Vec<Vec<f32>>>,
}

/// Embeddings from an Ollama server.
pub struct OllamaEmbedding {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedding {
    pub fn new(base_url: &str, model: &str) -> EmbeddingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Create the client and verify the server answers.
    pub async fn connect(base_url: &str, model: &str) -> EmbeddingResult<Self> {
        let provider = Self::new(base_url, model)?;
        provider.test_connection().await?;
        tracing::info!("Connected to Ollama at {} (model {})", provider.base_url, model);
        Ok(provider)
    }

    async fn test_connection(&self) -> EmbeddingResult<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| {
                EmbeddingError::Backend(format!("cannot reach Ollama at {}: {}", self.base_url, e))
            })?;
        if !response.status().is_success() {
            return Err(EmbeddingError::Backend(format!(
                "Ollama at {} answered {}",
                self.base_url,
                response.status()
            )));
        }
        Ok(())
    }

    async fn request(&self, body: &EmbedRequest<'_>) -> EmbeddingResult<EmbedResponse> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Backend(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Backend(format!("Ollama API error: {} - {}", status, text)));
        }
        response
            .json()
            .await
            .map_err(|e| EmbeddingError::Backend(format!("malformed Ollama response: {}", e)))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedding {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let response = self
            .request(&EmbedRequest::Single {
                model: &self.model,
                input: text,
            })
            .await?;
        if let Some(embedding) = response.embedding {
            return Ok(embedding);
        }
        response
            .embeddings
            .and_then(|e| e.into_iter().next())
            .ok_or_else(|| EmbeddingError::Backend("no embedding returned from Ollama".into()))
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .request(&EmbedRequest::Batch {
                model: &self.model,
                input: texts,
            })
            .await?;
        match response.embeddings {
            Some(embeddings) if embeddings.len() == texts.len() => Ok(embeddings),
            Some(embeddings) => Err(EmbeddingError::Backend(format!(
                "Ollama returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            ))),
            None => Err(EmbeddingError::Backend(
                "no embeddings returned from Ollama".into(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn mock_ollama() -> String {
        async fn embed(Json(body): Json<Value>) -> Json<Value> {
            let vectors: Vec<Value> = match &body["input"] {
                Value::Array(items) => items
                    .iter()
                    .map(|t| json!([t.as_str().unwrap_or("").len() as f32, 1.0]))
                    .collect(),
                Value::String(s) => vec![json!([s.len() as f32, 1.0])],
                _ => Vec::new(),
            };
            Json(json!({ "model": body["model"], "embeddings": vectors }))
        }

        let app = Router::new()
            .route("/api/tags", get(|| async { Json(json!({ "models": [] })) }))
            .route("/api/embed", post(embed));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_embed_single_and_batch() {
        let url = mock_ollama().await;
        let provider = OllamaEmbedding::connect(&url, "all-minilm").await.unwrap();
        assert_eq!(provider.model_name(), "all-minilm");

        assert_eq!(provider.embed("abc").await.unwrap(), vec![3.0, 1.0]);
        let batch = provider
            .embed_batch(&["a".to_string(), "abcd".to_string()])
            .await
            .unwrap();
        assert_eq!(batch, vec![vec![1.0, 1.0], vec![4.0, 1.0]]);
        assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_fails_when_unreachable() {
        let result = OllamaEmbedding::connect("http://127.0.0.1:1", "all-minilm").await;
        assert!(matches!(result, Err(EmbeddingError::Backend(_))));
    }
}
