use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// 32-byte caller identity, supplied by the external identity provider.
pub type ActorId = [u8; 32];

/// Number of decimal places carried by an [`Amount`] (same scale as wei/ether).
pub const AMOUNT_DECIMALS: u32 = 18;

const AMOUNT_SCALE: i128 = 10i128.pow(AMOUNT_DECIMALS);

/// Default public gateway used to resolve `ipfs://` pointers.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs";

/// Render an actor identity as 64 lowercase hex characters.
pub fn actor_hex(actor: &ActorId) -> String {
    hex::encode(actor)
}

/// Short form for log fields: first four bytes.
pub fn actor_short(actor: &ActorId) -> String {
    hex::encode(&actor[..4])
}

/// Parse a 64-character hex string into an actor identity.
pub fn parse_actor(s: &str) -> Result<ActorId, RegistryError> {
    let bytes = hex::decode(s.trim())
        .map_err(|e| RegistryError::InvalidInput(format!("actor id is not hex: {e}")))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        RegistryError::InvalidInput(format!("actor id must be 32 bytes, got {}", v.len()))
    })
}

/// Dense, zero-based artifact identifier. Allocated once, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub u64);

impl ArtifactId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ArtifactId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to content held by the external content store.
///
/// The registry never dereferences it. The only interpretation offered is
/// [`ContentPointer::gateway_url`], which maps `ipfs://` references onto an
/// HTTP gateway for download links.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentPointer(String);

impl ContentPointer {
    pub fn new(pointer: impl Into<String>) -> Result<Self, RegistryError> {
        let pointer = pointer.into();
        if pointer.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "content pointer must not be empty".into(),
            ));
        }
        Ok(Self(pointer))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme prefix (`ipfs`, `https`, ...) if the pointer has one.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Resolve `ipfs://<cid>` to `<gateway>/<cid>`. Other pointers are returned as-is.
    pub fn gateway_url(&self, gateway: &str) -> String {
        match self.0.strip_prefix("ipfs://") {
            Some(cid) => format!("{}/{}", gateway.trim_end_matches('/'), cid),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for ContentPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value in base units with 18 implied decimals.
///
/// Signed so that non-positive donations can be expressed and rejected at the
/// registry boundary rather than silently clamped by the type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_base_units(units: i128) -> Self {
        Self(units)
    }

    /// Whole units (e.g. `1` ether), scaled by 10^18.
    pub fn from_whole(whole: i64) -> Self {
        Self(whole as i128 * AMOUNT_SCALE)
    }

    pub fn base_units(&self) -> i128 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Parse a decimal string such as `"1.0"`, `"0.0001"` or `"-2"`.
    pub fn parse_decimal(s: &str) -> Result<Self, RegistryError> {
        let invalid = |why: &str| RegistryError::InvalidInput(format!("invalid amount {s:?}: {why}"));

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("unexpected character"));
        }
        if frac.len() > AMOUNT_DECIMALS as usize {
            return Err(invalid("more than 18 decimal places"));
        }

        let whole_units: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("out of range"))?
        };
        let frac_units: i128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = AMOUNT_DECIMALS as usize);
            padded.parse().map_err(|_| invalid("out of range"))?
        };

        let units = whole_units
            .checked_mul(AMOUNT_SCALE)
            .and_then(|w| w.checked_add(frac_units))
            .ok_or_else(|| invalid("out of range"))?;

        Ok(Self(if negative { -units } else { units }))
    }
}

impl FromStr for Amount {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let scale = AMOUNT_SCALE as u128;
        let whole = abs / scale;
        let frac = abs % scale;

        let mut frac_str = format!("{frac:0width$}", width = AMOUNT_DECIMALS as usize);
        while frac_str.len() > 1 && frac_str.ends_with('0') {
            frac_str.pop();
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{whole}.{frac_str}")
    }
}

/// A minted artifact.
///
/// Every field except `total_donations` is fixed at mint time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: ArtifactId,
    pub name: String,
    pub description: String,
    pub content_pointer: ContentPointer,
    pub owner: ActorId,
    pub total_donations: Amount,
}

impl ArtifactRecord {
    /// Case-insensitive match against name or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}
