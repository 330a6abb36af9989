use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Backend API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Record {id} not found in {table}")]
    NotFound { table: String, id: String },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
