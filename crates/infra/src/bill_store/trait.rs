use std::sync::Arc;

use thiserror::Error;

use retail_billing::Bill;
use retail_core::BillId;

/// Storage-level errors.
///
/// These describe why the backend failed, never why a bill is invalid. Domain
/// rules are checked before a bill reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend cannot be reached or its state is unusable (closed pool,
    /// poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The bill already carries an id, or the backend reported a key clash.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Bill persistence.
///
/// ## Contract
///
/// - `insert` takes an unpersisted bill, assigns a fresh unique id and returns
///   the stored bill carrying it.
/// - `find_one` is an equality lookup on the id; a missing bill is `Ok(None)`.
/// - `find_by_customer` is an equality lookup on the customer identity and
///   returns bills newest first (`bill_date` descending). An unknown identity
///   yields an empty list, not an error.
#[async_trait::async_trait]
pub trait BillStore: Send + Sync {
    async fn insert(&self, bill: Bill) -> Result<Bill, StoreError>;

    async fn find_one(&self, id: BillId) -> Result<Option<Bill>, StoreError>;

    async fn find_by_customer(&self, identity: &str) -> Result<Vec<Bill>, StoreError>;
}

#[async_trait::async_trait]
impl<S> BillStore for Arc<S>
where
    S: BillStore + ?Sized,
{
    async fn insert(&self, bill: Bill) -> Result<Bill, StoreError> {
        (**self).insert(bill).await
    }

    async fn find_one(&self, id: BillId) -> Result<Option<Bill>, StoreError> {
        (**self).find_one(id).await
    }

    async fn find_by_customer(&self, identity: &str) -> Result<Vec<Bill>, StoreError> {
        (**self).find_by_customer(identity).await
    }
}

/// Sort bills newest first, breaking ties on id so the order is stable.
pub(crate) fn newest_first(bills: &mut [Bill]) {
    bills.sort_by(|a, b| {
        b.bill_date()
            .cmp(&a.bill_date())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

/// Attach a store-generated id, reporting an already-persisted bill as a conflict.
pub(crate) fn stamp(bill: Bill, id: BillId) -> Result<Bill, StoreError> {
    bill.assign_id(id).map_err(|e| match e {
        retail_core::DomainError::Conflict(msg) => StoreError::Conflict(msg),
        other => StoreError::Database(other.to_string()),
    })
}
