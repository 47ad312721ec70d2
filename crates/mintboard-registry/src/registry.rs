use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::artifact::*;
use crate::error::RegistryError;
use crate::event::{Outcome, RegistryEvent};
use crate::store::{ArtifactStore, InMemoryArtifactStore};

type Result<T> = std::result::Result<T, RegistryError>;

/// What a successful donation recorded, and who it is owed to.
///
/// The registry only keeps the books. Moving `amount` to `payee` belongs to
/// the host, and the recorded total stands whatever that transfer does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationReceipt {
    pub id: ArtifactId,
    pub donor: ActorId,
    pub payee: ActorId,
    pub amount: Amount,
    pub total_donations: Amount,
}

/// Owns artifact records and the ID counter.
///
/// Generic over storage backends. Use `ArtifactRegistry::in_memory()` for
/// testing. Mint and append are not idempotent: every successful call
/// allocates a new ID, so callers must not blindly retry.
pub struct ArtifactRegistry<S: ArtifactStore> {
    store: S,
}

impl ArtifactRegistry<InMemoryArtifactStore> {
    pub fn in_memory() -> Self {
        Self::new(InMemoryArtifactStore::new())
    }
}

impl<S: ArtifactStore> ArtifactRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Register a new artifact owned by `caller`. Returns the allocated ID.
    pub fn mint(
        &mut self,
        name: &str,
        description: &str,
        content_pointer: &str,
        caller: ActorId,
    ) -> Result<Outcome<ArtifactId>> {
        require_text("name", name)?;
        require_text("description", description)?;
        let content_pointer = ContentPointer::new(content_pointer)?;

        let id = ArtifactId(self.store.next_id()?);
        let record = ArtifactRecord {
            id,
            name: name.to_string(),
            description: description.to_string(),
            content_pointer: content_pointer.clone(),
            owner: caller,
            total_donations: Amount::ZERO,
        };
        self.store.insert_artifact(&record)?;

        info!(
            artifact_id = %id,
            owner = %actor_short(&caller),
            pointer = %content_pointer,
            "Minted artifact"
        );

        Ok(Outcome::new(
            id,
            RegistryEvent::Minted {
                id,
                owner: caller,
                content_pointer,
            },
        ))
    }

    /// Record a donation of `amount` from `caller` against artifact `id`.
    pub fn donate(
        &mut self,
        id: ArtifactId,
        amount: Amount,
        caller: ActorId,
    ) -> Result<Outcome<DonationReceipt>> {
        if !amount.is_positive() {
            warn!(artifact_id = %id, %amount, "Rejected non-positive donation");
            return Err(RegistryError::InvalidAmount(format!(
                "donation must be greater than zero, got {amount}"
            )));
        }

        let record = self.get(id)?;
        let total = record.total_donations.checked_add(amount).ok_or_else(|| {
            RegistryError::InvalidAmount(format!("donation of {amount} overflows total for {id}"))
        })?;
        self.store.set_total_donations(id, total)?;

        info!(
            artifact_id = %id,
            donor = %actor_short(&caller),
            %amount,
            total = %total,
            "Donation received"
        );

        Ok(Outcome::new(
            DonationReceipt {
                id,
                donor: caller,
                payee: record.owner,
                amount,
                total_donations: total,
            },
            RegistryEvent::DonationReceived {
                id,
                donor: caller,
                amount,
            },
        ))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get(&self, id: ArtifactId) -> Result<ArtifactRecord> {
        match self.store.get_artifact(id)? {
            Some(record) => Ok(record),
            None => {
                debug!(artifact_id = %id, "Artifact lookup missed");
                Err(RegistryError::ArtifactNotFound(id))
            }
        }
    }

    /// Count of artifacts ever minted.
    pub fn next_id(&self) -> Result<u64> {
        self.store.next_id()
    }

    pub fn list(&self) -> Result<Vec<ArtifactRecord>> {
        self.store.list_artifacts()
    }

    /// Artifacts whose name or description contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Result<Vec<ArtifactRecord>> {
        let mut records = self.store.list_artifacts()?;
        records.retain(|r| r.matches(term));
        Ok(records)
    }

    pub fn by_owner(&self, owner: &ActorId) -> Result<Vec<ArtifactRecord>> {
        let mut records = self.store.list_artifacts()?;
        records.retain(|r| &r.owner == owner);
        Ok(records)
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
