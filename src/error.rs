//! Dayveil error types

use thiserror::Error;

/// Dayveil error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classification error
    #[error("Classification error: {0}")]
    Classification(String),

    /// Refinement backend error
    #[error("Refiner error: {0}")]
    Refiner(String),

    /// Pattern extraction error
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Topic history persistence error
    #[error("History error: {0}")]
    History(String),

    /// Prompt assembly error
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Dayveil operations
pub type Result<T> = std::result::Result<T, Error>;
