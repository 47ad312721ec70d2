//! Structured storage using redb
//!
//! Persists both registries:
//! - Artifact records keyed by ID
//! - Discussion posts keyed by index
//! - The two allocation counters
//!
//! Each mint or append commits the new row and its counter in a single write
//! transaction, so a reader never sees one without the other.

mod artifact_store;
mod post_store;
mod tables;

pub use artifact_store::RedbArtifactStore;
pub use post_store::RedbPostStore;
pub use tables::{
    RedbStorage, RedbStorageConfig, ARTIFACTS, NEXT_ARTIFACT_ID, NEXT_POST_INDEX, POSTS,
    REGISTRY_META,
};
