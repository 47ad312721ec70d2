//! Persisted discussion posts
//!
//! Implements the registry's `PostStore` on top of redb.

use std::sync::Arc;

use mintboard_registry::{Post, PostStore, RegistryError};
use tracing::debug;

use super::tables::{RedbStorage, NEXT_POST_INDEX, POSTS};
use crate::error::StorageError;

type Result<T> = std::result::Result<T, RegistryError>;

/// Post store backed by the `posts` table
pub struct RedbPostStore {
    storage: Arc<RedbStorage>,
}

impl RedbPostStore {
    /// Create a new post store
    pub fn new(storage: Arc<RedbStorage>) -> Self {
        Self { storage }
    }

    fn decode(value: &[u8]) -> std::result::Result<Post, StorageError> {
        postcard::from_bytes(value).map_err(|e| StorageError::deserialization(e.to_string()))
    }
}

impl PostStore for RedbPostStore {
    fn post_count(&self) -> Result<u64> {
        Ok(self.storage.counter(NEXT_POST_INDEX)?)
    }

    fn append_post(&mut self, post: &Post) -> Result<()> {
        let value = postcard::to_allocvec(post)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        self.storage.append(POSTS, NEXT_POST_INDEX, post.index, &value)?;
        debug!(index = post.index, "Stored post");
        Ok(())
    }

    fn get_post(&self, index: u64) -> Result<Option<Post>> {
        match self.storage.get(POSTS, index)? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    fn list_posts(&self) -> Result<Vec<Post>> {
        self.storage
            .scan(POSTS)?
            .iter()
            .map(|value| Self::decode(value).map_err(RegistryError::from))
            .collect()
    }
}
