/// AstraDB vector store over the Data API
///
/// API Flow:
/// 1. Collection setup: POST /api/json/v1/{keyspace} {"createCollection": ...}
/// 2. Upsert: POST /api/json/v1/{keyspace}/{collection} {"insertMany": ...}
/// 3. Search: POST /api/json/v1/{keyspace}/{collection} {"find": {"sort": {"$vector": ...}}}
///
/// Every command answers 200 and reports failures in an `errors` array, so the
/// body is checked even on success.
use std::sync::Arc;

use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Document, DocumentMetadata},
    services::providers::{ensure_success, Embedder, VectorStore},
};

const API_PATH: &str = "api/json/v1";
const TOKEN_HEADER: &str = "Token";

/// Stored shape of a review document
#[derive(Debug, Serialize, Deserialize)]
struct AstraDocument {
    #[serde(rename = "_id")]
    id: String,
    content: String,
    metadata: DocumentMetadata,
    #[serde(rename = "$vector", default, skip_serializing_if = "Vec::is_empty")]
    vector: Vec<f32>,
}

impl From<AstraDocument> for Document {
    fn from(doc: AstraDocument) -> Self {
        Document {
            page_content: doc.content,
            metadata: doc.metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse<T> {
    data: Option<T>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct FindData {
    documents: Vec<AstraDocument>,
}

#[derive(Clone)]
pub struct AstraDbVectorStore {
    http_client: HttpClient,
    api_endpoint: String,
    token: String,
    keyspace: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
    collection_ready: Arc<OnceCell<()>>,
}

impl AstraDbVectorStore {
    pub fn new(
        api_endpoint: String,
        token: String,
        keyspace: String,
        collection: String,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_endpoint,
            token,
            keyspace,
            collection,
            embedder,
            collection_ready: Arc::new(OnceCell::new()),
        }
    }

    fn keyspace_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            API_PATH,
            self.keyspace
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.keyspace_url(), self.collection)
    }

    async fn command<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &Value,
    ) -> AppResult<CommandResponse<T>> {
        let response = self
            .http_client
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;

        let response = ensure_success(response, "AstraDB").await?;
        let parsed: CommandResponse<T> = response.json().await?;
        Self::check_errors(parsed)
    }

    fn check_errors<T>(response: CommandResponse<T>) -> AppResult<CommandResponse<T>> {
        if response.errors.is_empty() {
            return Ok(response);
        }

        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        Err(AppError::ExternalApi(format!(
            "AstraDB command failed: {}",
            messages.join("; ")
        )))
    }

    fn create_collection_body(&self, dimension: usize) -> Value {
        json!({
            "createCollection": {
                "name": self.collection,
                "options": {
                    "vector": { "dimension": dimension, "metric": "cosine" }
                }
            }
        })
    }

    fn insert_many_body(documents: &[Document], vectors: Vec<Vec<f32>>) -> (Vec<String>, Value) {
        let stored: Vec<AstraDocument> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| AstraDocument {
                id: Uuid::new_v4().to_string(),
                content: doc.page_content.clone(),
                metadata: doc.metadata.clone(),
                vector,
            })
            .collect();

        let ids = stored.iter().map(|d| d.id.clone()).collect();
        let body = json!({
            "insertMany": {
                "documents": stored,
                "options": { "ordered": false }
            }
        });

        (ids, body)
    }

    fn find_body(vector: Vec<f32>, k: usize) -> Value {
        json!({
            "find": {
                "sort": { "$vector": vector },
                "projection": { "content": 1, "metadata": 1 },
                "options": { "limit": k }
            }
        })
    }

    /// Creates the collection with a cosine vector index of `dimension`.
    ///
    /// Re-creating an existing collection with the same settings is a no-op on
    /// the server side.
    pub async fn ensure_collection(&self, dimension: usize) -> AppResult<()> {
        let body = self.create_collection_body(dimension);
        let response: CommandResponse<Value> = self.command(&self.keyspace_url(), &body).await?;

        tracing::info!(
            collection = %self.collection,
            dimension,
            status = ?response.status,
            "Vector collection ready"
        );

        Ok(())
    }
}

#[async_trait::async_trait]
impl VectorStore for AstraDbVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> AppResult<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        let dimension = vectors.first().map(Vec::len).unwrap_or_default();
        self.collection_ready
            .get_or_try_init(|| self.ensure_collection(dimension))
            .await?;

        let (ids, body) = Self::insert_many_body(documents, vectors);
        let _: CommandResponse<Value> = self.command(&self.collection_url(), &body).await?;

        tracing::info!(
            collection = %self.collection,
            inserted = ids.len(),
            embedder = self.embedder.name(),
            "Documents added to vector store"
        );

        Ok(ids)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> AppResult<Vec<Document>> {
        let vector = self.embedder.embed_query(query).await?;
        let body = Self::find_body(vector, k);
        let response: CommandResponse<FindData> = self.command(&self.collection_url(), &body).await?;

        let documents: Vec<Document> = response
            .data
            .map(|data| data.documents.into_iter().map(Document::from).collect())
            .unwrap_or_default();

        tracing::info!(
            collection = %self.collection,
            k,
            results = documents.len(),
            "Similarity search completed"
        );

        Ok(documents)
    }

    fn name(&self) -> &'static str {
        "astra_db"
    }
}
