//! Error types for incident-intake

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Annotation service error: {0}")]
    Vendor(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Incident not found: {0}")]
    IncidentNotFound(String),

    #[error("Invalid incident status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
