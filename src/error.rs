use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Upstream answered with a non-success status.
    #[error("External API error: {message}")]
    ExternalApi {
        message: String,
        status: Option<u16>,
        body: Option<serde_json::Value>,
    },

    /// Generic failure reported at the HTTP boundary, with whatever the
    /// upstream returned kept for diagnostics.
    #[error("{message}")]
    Failed {
        message: String,
        status: Option<u16>,
        body: Option<serde_json::Value>,
    },

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Build an upstream error from a response status and raw body text.
    pub fn upstream(message: impl Into<String>, status: u16, body: &str) -> Self {
        let body = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.chars().take(500).collect()));
        AppError::ExternalApi {
            message: message.into(),
            status: Some(status),
            body: Some(body),
        }
    }

    /// Status code reported by the upstream service, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::ExternalApi { status, .. } | AppError::Failed { status, .. } => *status,
            AppError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Replace the error with a localized boundary failure.
    ///
    /// Client errors pass through untouched.
    pub fn localized(self, message: &str) -> Self {
        match self {
            AppError::BadRequest(_) | AppError::NotFound(_) => self,
            AppError::ExternalApi { status, body, .. } | AppError::Failed { status, body, .. } => {
                AppError::Failed {
                    message: message.to_string(),
                    status,
                    body,
                }
            }
            other => AppError::Failed {
                message: message.to_string(),
                status: other.upstream_status(),
                body: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let this = match self {
            AppError::Failed {
                message,
                status,
                body,
            } => {
                let body = Json(json!({
                    "error": message,
                    "status": status,
                    "data": body,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
            other => other,
        };

        let (status, message) = match &this {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalApi { message, .. } => (StatusCode::BAD_GATEWAY, message.clone()),
            AppError::Failed { message, .. } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
