//! Append-only public discussion log.
//!
//! Posts are identified by their position. Nothing edits, removes or reorders
//! them once appended.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifact::{ActorId, actor_short};
use crate::error::RegistryError;
use crate::event::{Outcome, RegistryEvent};
use crate::registry::require_text;
use crate::store::{InMemoryPostStore, PostStore};

type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub index: u64,
    pub author: ActorId,
    pub text: String,
}

/// Hook for the external identity-verification flow.
///
/// The log trusts the answer completely; how an actor became verified is not
/// its concern.
pub trait IdentityVerifier: Send + Sync {
    fn is_verified(&self, actor: &ActorId) -> bool;
}

/// Fixed set of verified actors, typically loaded from configuration.
#[derive(Clone, Debug, Default)]
pub struct VerifiedSet {
    actors: HashSet<ActorId>,
}

impl VerifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: ActorId) -> bool {
        self.actors.insert(actor)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl FromIterator<ActorId> for VerifiedSet {
    fn from_iter<T: IntoIterator<Item = ActorId>>(iter: T) -> Self {
        Self {
            actors: iter.into_iter().collect(),
        }
    }
}

impl IdentityVerifier for VerifiedSet {
    fn is_verified(&self, actor: &ActorId) -> bool {
        self.actors.contains(actor)
    }
}

/// Ordered sequence of posts.
///
/// Posting is open unless a verifier is attached with
/// [`DiscussionLog::with_verifier`], in which case unverified callers are
/// rejected with [`RegistryError::Unverified`].
pub struct DiscussionLog<S: PostStore> {
    store: S,
    verifier: Option<Arc<dyn IdentityVerifier>>,
}

impl DiscussionLog<InMemoryPostStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryPostStore::new())
    }
}

impl<S: PostStore> DiscussionLog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            verifier: None,
        }
    }

    /// Require callers of [`append`](Self::append) to pass `verifier`.
    pub fn with_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn requires_verification(&self) -> bool {
        self.verifier.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append `text` as a post by `caller`. Returns the new post's index.
    pub fn append(&mut self, text: &str, caller: ActorId) -> Result<Outcome<u64>> {
        require_text("post text", text)?;
        if let Some(verifier) = &self.verifier
            && !verifier.is_verified(&caller)
        {
            warn!(author = %actor_short(&caller), "Rejected post from unverified caller");
            return Err(RegistryError::Unverified);
        }

        let index = self.store.post_count()?;
        let post = Post {
            index,
            author: caller,
            text: text.to_string(),
        };
        self.store.append_post(&post)?;

        info!(index, author = %actor_short(&caller), "Post added");

        Ok(Outcome::new(
            index,
            RegistryEvent::PostAdded {
                index,
                author: caller,
            },
        ))
    }

    pub fn count(&self) -> Result<u64> {
        self.store.post_count()
    }

    pub fn get(&self, index: u64) -> Result<Post> {
        self.store
            .get_post(index)?
            .ok_or(RegistryError::PostNotFound(index))
    }

    pub fn posts(&self) -> Result<Vec<Post>> {
        self.store.list_posts()
    }

    pub fn by_author(&self, author: &ActorId) -> Result<Vec<Post>> {
        let mut posts = self.store.list_posts()?;
        posts.retain(|p| &p.author == author);
        Ok(posts)
    }
}
