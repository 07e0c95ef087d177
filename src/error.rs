use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GardenError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Live update connection failed: {0:#}")]
    TransportError(#[from] anyhow::Error),

    #[error("No server address configured (run `garden setup <address>` first)")]
    NoServerAddress,

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Garden system not found: {0}")]
    SystemNotFound(String),

    #[error("Server returned {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl GardenError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            GardenError::NoServerAddress => "NO_SERVER_ADDRESS",
            GardenError::InvalidAddress(_) => "INVALID_ADDRESS",
            GardenError::InvalidInput(_) => "INVALID_INPUT",
            GardenError::SystemNotFound(_) => "SYSTEM_NOT_FOUND",
            GardenError::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            GardenError::DatabaseError(_) => "DATABASE_ERROR",
            GardenError::HttpError(_) | GardenError::TransportError(_) => "CONNECTION_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.to_error_code().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GardenError>;
