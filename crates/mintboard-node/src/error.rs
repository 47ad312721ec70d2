//! Error types for the registry node

use mintboard_registry::RegistryError;
use mintboard_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in the registry node
#[derive(Debug, Error)]
pub enum NodeError {
    /// Rejected by the registry or discussion log
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl NodeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NodeError::Registry(e) if e.is_not_found())
    }
}

impl From<toml::de::Error> for NodeError {
    fn from(e: toml::de::Error) -> Self {
        NodeError::Config(e.to_string())
    }
}

/// Result type alias for node operations
pub type NodeResult<T> = Result<T, NodeError>;
