//! Infrastructure layer: bill storage backends and the billing service that
//! composes them with the discount engine.

pub mod bill_service;
pub mod bill_store;

pub use bill_service::{BillService, BillingError};
pub use bill_store::{BillStore, InMemoryBillStore, StoreError};
#[cfg(feature = "postgres")]
pub use bill_store::PostgresBillStore;
