/// HuggingFace Inference API embeddings
///
/// Calls the feature-extraction pipeline of a hosted sentence-embedding model.
/// API Flow:
/// POST {api_url}/models/{model}/pipeline/feature-extraction
///   {"inputs": ["text", ...]} → [[f32, ...], ...]
use reqwest::Client as HttpClient;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::{ensure_success, Embedder},
};

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

#[derive(Clone)]
pub struct HuggingFaceEmbedder {
    http_client: HttpClient,
    api_url: String,
    model: String,
    token: Option<String>,
}

impl HuggingFaceEmbedder {
    pub fn new(api_url: String, model: String, token: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            model,
            token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    fn check_vector_count(expected: usize, vectors: Vec<Vec<f32>>) -> AppResult<Vec<Vec<f32>>> {
        if vectors.len() != expected {
            return Err(AppError::ExternalApi(format!(
                "Embedding API returned {} vectors for {} inputs",
                vectors.len(),
                expected
            )));
        }
        if vectors.iter().any(Vec::is_empty) {
            return Err(AppError::ExternalApi(
                "Embedding API returned an empty vector".to_string(),
            ));
        }
        Ok(vectors)
    }
}

#[async_trait::async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .http_client
            .post(self.endpoint())
            .json(&FeatureExtractionRequest { inputs: texts });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = ensure_success(request.send().await?, "HuggingFace").await?;
        let vectors: Vec<Vec<f32>> = response.json().await?;
        let vectors = Self::check_vector_count(texts.len(), vectors)?;

        tracing::debug!(
            model = %self.model,
            inputs = texts.len(),
            dimension = vectors[0].len(),
            "Embeddings generated"
        );

        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vectors = self.embed_documents(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::ExternalApi("Embedding API returned no vector".to_string()))
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
