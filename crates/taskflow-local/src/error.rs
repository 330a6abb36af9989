use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("You must have at least one list")]
    LastList,

    #[error("Invalid item filter: {0}")]
    InvalidFilter(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
