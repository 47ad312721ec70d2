//! # Mintboard Registry
//!
//! The two registries at the heart of Mintboard:
//!
//! - [`ArtifactRegistry`]: mints artifacts under dense integer IDs and keeps
//!   a running donation total per artifact.
//! - [`DiscussionLog`]: an append-only sequence of public posts.
//!
//! Both are plain owned state objects generic over a storage trait. Callers
//! pass the acting identity into every mutation, and every mutation returns an
//! [`Outcome`] carrying the events to publish. Serializing writers is left to
//! the host (see `mintboard-node`).
//!
//! ```
//! use mintboard_registry::*;
//!
//! let alice: ActorId = [1u8; 32];
//! let bob: ActorId = [2u8; 32];
//!
//! let mut registry = ArtifactRegistry::in_memory();
//! let id = registry.mint("Escrow", "Two-party escrow", "ipfs://bafy", alice).unwrap().value;
//! registry.donate(id, Amount::parse_decimal("0.5").unwrap(), bob).unwrap();
//! assert_eq!(registry.get(id).unwrap().total_donations.to_string(), "0.5");
//! ```

pub mod artifact;
pub mod discussion;
pub mod error;
pub mod event;
pub mod registry;
pub mod store;

pub use artifact::*;
pub use discussion::{DiscussionLog, IdentityVerifier, Post, VerifiedSet};
pub use error::RegistryError;
pub use event::{Outcome, RegistryEvent};
pub use registry::{ArtifactRegistry, DonationReceipt};
pub use store::{ArtifactStore, InMemoryArtifactStore, InMemoryPostStore, PostStore};
