use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Invalid setting {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No meme candidate was downloaded")]
    NoCandidate,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Http(e) => {
                tracing::error!("HTTP error: {}", e);
                (StatusCode::BAD_GATEWAY, "Meme source unreachable".to_string())
            }
            AppError::UpstreamStatus { url, status } => {
                tracing::warn!("Upstream {} answered {}", url, status);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Meme source answered with status {}", status),
                )
            }
            AppError::Scrape(msg) => {
                tracing::warn!("Scrape error: {}", msg);
                (StatusCode::BAD_GATEWAY, format!("Unexpected page layout: {}", msg))
            }
            AppError::InvalidConfig { key, value } => {
                tracing::error!("Invalid setting {} = {:?}", key, value);
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid configuration".to_string())
            }
            AppError::UnknownCommand(name) => {
                (StatusCode::NOT_FOUND, format!("Unknown command: {}", name))
            }
            AppError::NoCandidate => {
                (StatusCode::BAD_GATEWAY, "No meme could be downloaded".to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
