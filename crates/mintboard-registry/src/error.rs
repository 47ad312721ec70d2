use thiserror::Error;

use crate::artifact::ArtifactId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),
    #[error("post not found: {0}")]
    PostNotFound(u64),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("caller is not verified to post")]
    Unverified,
    #[error("store error: {0}")]
    StoreError(String),
}

impl RegistryError {
    /// True for references to an artifact ID or post index that was never allocated.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArtifactNotFound(_) | Self::PostNotFound(_))
    }
}
