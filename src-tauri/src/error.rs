use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for the whole app.
///
/// Only `Read`, `Decode`, `Transport` and `Semantic` ever reach the workflow's
/// error state. The rest are handled where they occur and logged.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum AppError {
    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API returned unsuccessful response: {0}")]
    Semantic(String),

    #[error("Failed to parse stored history: {0}")]
    StorageParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to send telemetry: {0}")]
    Telemetry(String),
}

impl AppError {
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Read(_) | AppError::Decode(_) | AppError::Transport(_) | AppError::Semantic(_)
        )
    }

    /// Text shown in the result panel.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Semantic(_) => "Error analyzing image".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Read(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
