use thiserror::Error;

/// Errors raised while setting up or persisting a game
#[derive(Error, Debug)]
pub enum GameError {
    #[error("puzzle catalog is empty")]
    CatalogEmpty,

    #[error("puzzle #{index} is invalid: {reason}")]
    InvalidPuzzle { index: usize, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to parse catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors reported by a persistence backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt saved state: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
