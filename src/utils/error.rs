// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error), // Automatically convert rusqlite errors

    #[error("Invalid table prefix: {0}")]
    InvalidPrefix(String),

    #[error("Getting site details for {0} failed")]
    SiteNotFound(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No results to export")]
    NoResults,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Content store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Error running export: {0}")]
    Storage(#[from] StorageError),
}
