/// Groq chat completions
///
/// Groq serves an OpenAI-compatible API:
/// POST {api_url}/chat/completions with a bearer key.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::ChatMessage,
    services::providers::{ensure_success, ChatModel},
};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct GroqChatModel {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
}

impl GroqChatModel {
    pub fn new(api_key: String, api_url: String, model: String, temperature: f32) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
            temperature,
        }
    }

    fn build_request<'a>(&'a self, messages: &'a [ChatMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_api_role(),
                    content: &m.content,
                })
                .collect(),
        }
    }

    fn extract_answer(response: CompletionResponse) -> AppResult<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalApi("Groq API returned no completion".to_string()))
    }
}

#[async_trait::async_trait]
impl ChatModel for GroqChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(messages))
            .send()
            .await?;

        let response = ensure_success(response, "Groq").await?;
        let completion: CompletionResponse = response.json().await?;
        let answer = Self::extract_answer(completion)?;

        tracing::info!(
            model = %self.model,
            messages = messages.len(),
            answer_chars = answer.len(),
            provider = "groq",
            "Completion received"
        );

        Ok(answer)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_model() -> GroqChatModel {
        GroqChatModel::new(
            "gsk_test".to_string(),
            "http://test.local/openai/v1".to_string(),
            "llama-3.1-8b-instant".to_string(),
            0.5,
        )
    }

    #[test]
    fn test_build_request_maps_roles() {
        let model = create_test_model();
        let messages = vec![
            ChatMessage::system("You recommend products."),
            ChatMessage::human("Best earbuds?"),
            ChatMessage::ai("Try the boAt Airdopes."),
        ];

        let body = serde_json::to_value(model.build_request(&messages)).unwrap();

        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Best earbuds?");
        assert_eq!(body["messages"][2]["role"], "assistant");
    }

    #[test]
    fn test_extract_answer_takes_first_choice() {
        let response: CompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "First" } },
                { "index": 1, "message": { "role": "assistant", "content": "Second" } }
            ]
        }))
        .unwrap();

        assert_eq!(GroqChatModel::extract_answer(response).unwrap(), "First");
    }

    #[test]
    fn test_extract_answer_without_choices() {
        let response: CompletionResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();

        let result = GroqChatModel::extract_answer(response);
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
