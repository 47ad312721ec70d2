//! # Mintboard Node
//!
//! Async host for the Mintboard registries.
//!
//! [`RegistryNode`] owns one [`ArtifactRegistry`] and one [`DiscussionLog`],
//! each behind its own `RwLock`: mutations on a registry are applied one at a
//! time, reads share the lock and always see a committed state. Events from
//! successful mutations are queued to every subscriber before the write lock
//! is released, so each subscriber sees a registry's events in the order its
//! state changed. Subscriber queues are unbounded: a slow reader delays its
//! own events but never loses them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mintboard_node::{NodeConfig, RegistryNode};
//!
//! let node = RegistryNode::open(NodeConfig::with_data_dir("./my-node")).await?;
//! let mut events = node.subscribe();
//!
//! let id = node.mint("Escrow", "Two-party escrow", "ipfs://bafy", alice).await?;
//! node.donate(id, "0.5".parse()?, bob).await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{}: {:?}", event.kind(), event);
//! }
//! ```

pub mod config;
mod error;

pub use config::{Cli, Command, DiscussionConfig, NodeConfig};
pub use error::{NodeError, NodeResult};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, instrument, warn};

use mintboard_registry::{
    ActorId, Amount, ArtifactId, ArtifactRecord, ArtifactRegistry, ArtifactStore, DiscussionLog,
    DonationReceipt, InMemoryArtifactStore, InMemoryPostStore, Post, PostStore, RegistryEvent,
    actor_short,
};
use mintboard_storage::{RedbArtifactStore, RedbPostStore, RedbStorage};

/// Host for an artifact registry and a discussion log
pub struct RegistryNode<A: ArtifactStore = RedbArtifactStore, P: PostStore = RedbPostStore> {
    /// Node configuration
    config: NodeConfig,
    /// Artifact registry, one writer at a time
    registry: RwLock<ArtifactRegistry<A>>,
    /// Discussion log, one writer at a time
    discussion: RwLock<DiscussionLog<P>>,
    /// Notification sink, one queue per subscriber
    subscribers: Mutex<Vec<mpsc::UnboundedSender<RegistryEvent>>>,
}

/// Stream of events handed out by [`RegistryNode::subscribe`]
pub type EventReceiver = mpsc::UnboundedReceiver<RegistryEvent>;

impl RegistryNode<RedbArtifactStore, RedbPostStore> {
    /// Open (or create) the redb database under `config.data_dir`
    #[instrument(skip(config), fields(data_dir = %config.data_dir.display()))]
    pub async fn open(config: NodeConfig) -> NodeResult<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|e| NodeError::Io(e.to_string()))?;

        let storage = Arc::new(RedbStorage::open(config.storage_config())?);
        let artifacts = RedbArtifactStore::new(storage.clone());
        let posts = RedbPostStore::new(storage);

        Self::with_stores(config, artifacts, posts)
    }
}

impl RegistryNode<InMemoryArtifactStore, InMemoryPostStore> {
    /// Node that keeps everything in memory
    pub fn in_memory(config: NodeConfig) -> NodeResult<Self> {
        Self::with_stores(config, InMemoryArtifactStore::new(), InMemoryPostStore::new())
    }
}

impl<A: ArtifactStore, P: PostStore> RegistryNode<A, P> {
    /// Build a node over the given stores
    pub fn with_stores(config: NodeConfig, artifacts: A, posts: P) -> NodeResult<Self> {
        let mut discussion = DiscussionLog::new(posts);
        if let Some(verified) = config.verifier()? {
            info!(verified = verified.len(), "Posting restricted to verified actors");
            discussion = discussion.with_verifier(Arc::new(verified));
        }

        Ok(Self {
            registry: RwLock::new(ArtifactRegistry::new(artifacts)),
            discussion: RwLock::new(discussion),
            subscribers: Mutex::new(Vec::new()),
            config,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Receive every event published after this call
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    // Never rolls back state: an event nobody receives is only logged
    fn publish(&self, events: Vec<RegistryEvent>) {
        let mut subscribers = self.subscribers.lock();
        for event in events {
            let kind = event.kind();
            let before = subscribers.len();
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
            if before > subscribers.len() {
                debug!(kind, closed = before - subscribers.len(), "Dropped closed subscribers");
            }
            if subscribers.is_empty() {
                warn!(kind, "Event dropped, no subscribers");
            } else {
                debug!(kind, receivers = subscribers.len(), "Published event");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Artifact registry
    // -----------------------------------------------------------------------

    #[instrument(skip(self, name, description, content_pointer, caller), fields(caller = %actor_short(&caller)))]
    pub async fn mint(
        &self,
        name: &str,
        description: &str,
        content_pointer: &str,
        caller: ActorId,
    ) -> NodeResult<ArtifactId> {
        let mut registry = self.registry.write().await;
        let (id, events) = registry.mint(name, description, content_pointer, caller)?.into_parts();
        self.publish(events);
        Ok(id)
    }

    #[instrument(skip(self, caller), fields(caller = %actor_short(&caller)))]
    pub async fn donate(
        &self,
        id: ArtifactId,
        amount: Amount,
        caller: ActorId,
    ) -> NodeResult<DonationReceipt> {
        let mut registry = self.registry.write().await;
        let (receipt, events) = registry.donate(id, amount, caller)?.into_parts();
        self.publish(events);
        Ok(receipt)
    }

    pub async fn get(&self, id: ArtifactId) -> NodeResult<ArtifactRecord> {
        Ok(self.registry.read().await.get(id)?)
    }

    pub async fn next_id(&self) -> NodeResult<u64> {
        Ok(self.registry.read().await.next_id()?)
    }

    pub async fn list(&self) -> NodeResult<Vec<ArtifactRecord>> {
        Ok(self.registry.read().await.list()?)
    }

    pub async fn search(&self, term: &str) -> NodeResult<Vec<ArtifactRecord>> {
        Ok(self.registry.read().await.search(term)?)
    }

    pub async fn by_owner(&self, owner: &ActorId) -> NodeResult<Vec<ArtifactRecord>> {
        Ok(self.registry.read().await.by_owner(owner)?)
    }

    /// Download link for an artifact's content, via the configured gateway
    pub async fn content_url(&self, id: ArtifactId) -> NodeResult<String> {
        let record = self.get(id).await?;
        Ok(record.content_pointer.gateway_url(&self.config.gateway))
    }

    // -----------------------------------------------------------------------
    // Discussion log
    // -----------------------------------------------------------------------

    #[instrument(skip(self, text, caller), fields(caller = %actor_short(&caller)))]
    pub async fn append(&self, text: &str, caller: ActorId) -> NodeResult<u64> {
        let mut discussion = self.discussion.write().await;
        let (index, events) = discussion.append(text, caller)?.into_parts();
        self.publish(events);
        Ok(index)
    }

    pub async fn post_count(&self) -> NodeResult<u64> {
        Ok(self.discussion.read().await.count()?)
    }

    pub async fn get_post(&self, index: u64) -> NodeResult<Post> {
        Ok(self.discussion.read().await.get(index)?)
    }

    pub async fn posts(&self) -> NodeResult<Vec<Post>> {
        Ok(self.discussion.read().await.posts()?)
    }

    pub async fn posts_by(&self, author: &ActorId) -> NodeResult<Vec<Post>> {
        Ok(self.discussion.read().await.by_author(author)?)
    }
}
