use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BotResult<T> = Result<T, BotError>;
