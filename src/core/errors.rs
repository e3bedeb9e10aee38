use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for domain, storage, and service layers.
#[derive(Error, Debug)]
pub enum FieldServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Backup error: {0}")]
    BackupError(String),
}

pub type Result<T> = StdResult<T, FieldServiceError>;

impl From<std::io::Error> for FieldServiceError {
    fn from(err: std::io::Error) -> Self {
        FieldServiceError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FieldServiceError {
    fn from(err: serde_json::Error) -> Self {
        FieldServiceError::StorageError(err.to_string())
    }
}

impl From<serde_yaml::Error> for FieldServiceError {
    fn from(err: serde_yaml::Error) -> Self {
        FieldServiceError::ConfigError(err.to_string())
    }
}

impl From<zip::result::ZipError> for FieldServiceError {
    fn from(err: zip::result::ZipError) -> Self {
        FieldServiceError::BackupError(err.to_string())
    }
}
