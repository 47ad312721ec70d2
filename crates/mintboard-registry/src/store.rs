use crate::artifact::{Amount, ArtifactId, ArtifactRecord};
use crate::discussion::Post;
use crate::error::RegistryError;

type Result<T> = std::result::Result<T, RegistryError>;

// ---------------------------------------------------------------------------
// ArtifactStore
// ---------------------------------------------------------------------------

/// Backing storage for the artifact registry.
///
/// Implementations must apply each mutating call completely or not at all.
pub trait ArtifactStore {
    /// Number of records ever inserted; also the next ID to allocate.
    fn next_id(&self) -> Result<u64>;
    /// Insert a freshly minted record and advance the counter past it.
    /// `record.id` must equal `next_id()`.
    fn insert_artifact(&mut self, record: &ArtifactRecord) -> Result<()>;
    fn get_artifact(&self, id: ArtifactId) -> Result<Option<ArtifactRecord>>;
    fn set_total_donations(&mut self, id: ArtifactId, total: Amount) -> Result<()>;
    /// All records in ID order.
    fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>>;
}

/// In-memory artifact store backed by a Vec indexed by ID.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    artifacts: Vec<ArtifactRecord>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn next_id(&self) -> Result<u64> {
        Ok(self.artifacts.len() as u64)
    }

    fn insert_artifact(&mut self, record: &ArtifactRecord) -> Result<()> {
        let expected = self.artifacts.len() as u64;
        if record.id.value() != expected {
            return Err(RegistryError::StoreError(format!(
                "out-of-order insert: got id {}, expected {expected}",
                record.id
            )));
        }
        self.artifacts.push(record.clone());
        Ok(())
    }

    fn get_artifact(&self, id: ArtifactId) -> Result<Option<ArtifactRecord>> {
        Ok(usize::try_from(id.value())
            .ok()
            .and_then(|i| self.artifacts.get(i))
            .cloned())
    }

    fn set_total_donations(&mut self, id: ArtifactId, total: Amount) -> Result<()> {
        let record = usize::try_from(id.value())
            .ok()
            .and_then(|i| self.artifacts.get_mut(i))
            .ok_or(RegistryError::ArtifactNotFound(id))?;
        record.total_donations = total;
        Ok(())
    }

    fn list_artifacts(&self) -> Result<Vec<ArtifactRecord>> {
        Ok(self.artifacts.clone())
    }
}

// ---------------------------------------------------------------------------
// PostStore
// ---------------------------------------------------------------------------

/// Append-only post storage for the discussion log.
pub trait PostStore {
    fn post_count(&self) -> Result<u64>;
    /// Append at the end. `post.index` must equal `post_count()`.
    fn append_post(&mut self, post: &Post) -> Result<()>;
    fn get_post(&self, index: u64) -> Result<Option<Post>>;
    /// All posts in append order.
    fn list_posts(&self) -> Result<Vec<Post>>;
}

/// In-memory post store backed by a Vec.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: Vec<Post>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for InMemoryPostStore {
    fn post_count(&self) -> Result<u64> {
        Ok(self.posts.len() as u64)
    }

    fn append_post(&mut self, post: &Post) -> Result<()> {
        let expected = self.posts.len() as u64;
        if post.index != expected {
            return Err(RegistryError::StoreError(format!(
                "out-of-order append: got index {}, expected {expected}",
                post.index
            )));
        }
        self.posts.push(post.clone());
        Ok(())
    }

    fn get_post(&self, index: u64) -> Result<Option<Post>> {
        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| self.posts.get(i))
            .cloned())
    }

    fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }
}
