//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a persisted bill.
///
/// Assigned by the storage layer when a bill is inserted; never present on a
/// freshly assembled bill.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(Uuid);

impl BillId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BillId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for BillId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BillId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s).map_err(|e| DomainError::invalid_id(format!("BillId: {e}")))?;
        Ok(Self(uuid))
    }
}
