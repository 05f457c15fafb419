use std::panic::Location;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// Another error annotated with what was being attempted and where.
    #[error("{message} | Error: {source} | File: {file} | Line: {line}")]
    Context {
        message: String,
        source: Box<AppError>,
        file: &'static str,
        line: u32,
    },
}

impl AppError {
    /// Wraps this error with a message and the caller's source location.
    #[track_caller]
    pub fn context(self, message: impl Into<String>) -> Self {
        let location = Location::caller();
        AppError::Context {
            message: message.into(),
            source: Box::new(self),
            file: location.file(),
            line: location.line(),
        }
    }

    /// Innermost error, skipping any context layers.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status the error surfaces as
    pub fn status(&self) -> StatusCode {
        match self.root() {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Adds call-site context to fallible results.
pub trait ResultExt<T> {
    fn context(self, message: impl Into<String>) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    #[track_caller]
    fn context(self, message: impl Into<String>) -> AppResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(e.into().context(message)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = %status, error = %self, "Request failed");

        // Upstream and internal details stay in the logs.
        let message = match self.root() {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg.clone(),
            AppError::ExternalApi(_) | AppError::HttpClient(_) => {
                "The recommendation service is temporarily unavailable".to_string()
            }
            _ => "Internal server error".to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
