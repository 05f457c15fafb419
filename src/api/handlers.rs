use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    services::DEFAULT_SESSION_ID,
};

use super::{metrics::PROMETHEUS_CONTENT_TYPE, AppState};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

// Request types

/// Form posted by the chat page
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub msg: Option<String>,
    pub session_id: Option<String>,
}

impl ChatForm {
    fn message(&self) -> AppResult<&str> {
        self.msg
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing 'msg' form field".to_string()))
    }

    fn session(&self) -> &str {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Chat interface
pub async fn index(State(state): State<AppState>) -> Html<&'static str> {
    state.metrics.record_http_request();
    Html(INDEX_HTML)
}

/// Answers one chat message with the RAG chain, as plain text
pub async fn get_response(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    form: Result<Form<ChatForm>, FormRejection>,
) -> AppResult<String> {
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let message = form.message()?;
    let session_id = form.session();

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        message_chars = message.chars().count(),
        "Processing chat message"
    );

    let result = state.rag_chain.invoke(message, session_id).await;
    state.metrics.record_chat(result.is_ok());
    result
}

/// Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.prometheus_output(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(msg: Option<&str>, session_id: Option<&str>) -> ChatForm {
        ChatForm {
            msg: msg.map(String::from),
            session_id: session_id.map(String::from),
        }
    }

    #[test]
    fn test_message_is_trimmed() {
        assert_eq!(form(Some("  hi there "), None).message().unwrap(), "hi there");
    }

    #[test]
    fn test_missing_or_blank_message() {
        assert!(matches!(form(None, None).message(), Err(AppError::InvalidInput(_))));
        assert!(matches!(form(Some("  "), None).message(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_session_defaults() {
        assert_eq!(form(None, None).session(), DEFAULT_SESSION_ID);
        assert_eq!(form(None, Some(" ")).session(), DEFAULT_SESSION_ID);
        assert_eq!(form(None, Some("tab-7")).session(), "tab-7");
    }

    #[test]
    fn test_index_page_posts_to_chat_endpoint() {
        assert!(INDEX_HTML.contains("/get"));
        assert!(INDEX_HTML.contains("name=\"msg\""));
    }
}
