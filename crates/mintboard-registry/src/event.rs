use serde::{Deserialize, Serialize};

use crate::artifact::{ActorId, Amount, ArtifactId, ContentPointer};

/// Notification produced by a successful mutating operation.
///
/// Registries never deliver these themselves; they hand them back inside an
/// [`Outcome`] and the host decides where they go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    Minted {
        id: ArtifactId,
        owner: ActorId,
        content_pointer: ContentPointer,
    },
    DonationReceived {
        id: ArtifactId,
        donor: ActorId,
        amount: Amount,
    },
    PostAdded {
        index: u64,
        author: ActorId,
    },
}

impl RegistryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Minted { .. } => "minted",
            Self::DonationReceived { .. } => "donation_received",
            Self::PostAdded { .. } => "post_added",
        }
    }
}

/// Result of an applied operation plus the events to publish for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<RegistryEvent>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, event: RegistryEvent) -> Self {
        Self {
            value,
            events: vec![event],
        }
    }

    pub fn into_parts(self) -> (T, Vec<RegistryEvent>) {
        (self.value, self.events)
    }
}
