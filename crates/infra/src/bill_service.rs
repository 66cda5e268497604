//! Bill assembly and retrieval.
//!
//! `BillService` composes the pure discount engine with a `BillStore`:
//!
//! ```text
//! BillRequest -> compute -> Bill::assemble -> BillStore::insert -> Bill (with id)
//! ```
//!
//! The service holds no state of its own beyond the store handle. Exactly one
//! insert happens per created bill and nothing is retried.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use retail_billing::{Bill, BillRequest, compute};
use retail_core::{BillId, DomainError};

use crate::bill_store::{BillStore, StoreError};

/// Failures surfaced by the billing service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("{0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; the message is passed through unchanged.
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for BillingError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => BillingError::Validation(msg),
            DomainError::InvalidDate(msg) => BillingError::InvalidDate(msg),
            DomainError::InvalidId(msg) => BillingError::InvalidId(msg),
            DomainError::Conflict(msg) => BillingError::Conflict(msg),
        }
    }
}

impl From<StoreError> for BillingError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => BillingError::Conflict(msg),
            other => BillingError::Store(other),
        }
    }
}

/// Creates and looks up bills through a `BillStore`.
#[derive(Debug, Clone)]
pub struct BillService<S> {
    store: S,
}

impl<S> BillService<S>
where
    S: BillStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Price `request` as of `now`, stamp `now` as the bill date and persist it.
    #[instrument(skip(self, request), fields(customer = %request.customer().identity), err)]
    pub async fn create_bill(&self, request: BillRequest, now: DateTime<Utc>) -> Result<Bill, BillingError> {
        let breakdown = compute(request.items(), request.customer(), now);
        let bill = Bill::assemble(request, breakdown, now);
        let stored = self.store.insert(bill).await?;

        info!(
            bill_id = ?stored.id(),
            customer = %stored.customer().identity,
            total_amount = %stored.total_amount(),
            net_payable_amount = %stored.net_payable_amount(),
            "bill created"
        );

        Ok(stored)
    }

    #[instrument(skip(self), fields(bill_id = %id), err)]
    pub async fn find_by_id(&self, id: BillId) -> Result<Bill, BillingError> {
        match self.store.find_one(id).await? {
            Some(bill) => Ok(bill),
            None => {
                warn!(bill_id = %id, "bill not found");
                Err(BillingError::NotFound(format!("Bill not found with ID: {id}")))
            }
        }
    }

    /// Every bill for `identity`, newest first. An empty result is `NotFound`.
    #[instrument(skip(self), err)]
    pub async fn find_by_customer(&self, identity: &str) -> Result<Vec<Bill>, BillingError> {
        let bills = self.store.find_by_customer(identity).await?;
        if bills.is_empty() {
            warn!(customer = %identity, "no bills for customer");
            return Err(BillingError::NotFound(format!(
                "No bills found for customer ID: {identity}"
            )));
        }
        Ok(bills)
    }
}
