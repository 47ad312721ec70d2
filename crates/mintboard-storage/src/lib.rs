//! # Mintboard Storage
//!
//! Persistent backends for the Mintboard registries.
//!
//! ## Features
//!
//! - **RedbStorage**: owns the redb database and its table layout
//! - **RedbArtifactStore**: `ArtifactStore` over the `artifacts` table
//! - **RedbPostStore**: `PostStore` over the `posts` table
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mintboard_registry::{ArtifactRegistry, DiscussionLog};
//! use mintboard_storage::{RedbArtifactStore, RedbPostStore, RedbStorage, RedbStorageConfig};
//!
//! let storage = Arc::new(RedbStorage::open(RedbStorageConfig::with_path("./data/mintboard.redb"))?);
//! let mut registry = ArtifactRegistry::new(RedbArtifactStore::new(storage.clone()));
//! let mut log = DiscussionLog::new(RedbPostStore::new(storage));
//! ```

pub mod error;
pub mod structured;

// Re-exports
pub use error::StorageError;
pub use structured::{RedbArtifactStore, RedbPostStore, RedbStorage, RedbStorageConfig};
