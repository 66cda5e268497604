use std::collections::HashMap;
use std::sync::RwLock;

use retail_billing::Bill;
use retail_core::BillId;

use super::r#trait::{BillStore, StoreError, newest_first, stamp};

/// In-memory bill store.
///
/// Intended for tests/dev. Lookups by customer scan every bill.
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    bills: RwLock<HashMap<BillId, Bill>>,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.bills
            .read()
            .map(|b| b.len())
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait::async_trait]
impl BillStore for InMemoryBillStore {
    #[tracing::instrument(skip(self, bill), err)]
    async fn insert(&self, bill: Bill) -> Result<Bill, StoreError> {
        let id = BillId::new();
        let stored = stamp(bill, id)?;

        let mut bills = self
            .bills
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if bills.contains_key(&id) {
            return Err(StoreError::Conflict(format!("bill id {id} already stored")));
        }
        bills.insert(id, stored.clone());

        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(bill_id = %id), err)]
    async fn find_one(&self, id: BillId) -> Result<Option<Bill>, StoreError> {
        let bills = self
            .bills
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(bills.get(&id).cloned())
    }

    #[tracing::instrument(skip(self), err)]
    async fn find_by_customer(&self, identity: &str) -> Result<Vec<Bill>, StoreError> {
        let bills = self
            .bills
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let mut matching: Vec<Bill> = bills
            .values()
            .filter(|b| b.customer().identity == identity)
            .cloned()
            .collect();
        newest_first(&mut matching);

        Ok(matching)
    }
}
