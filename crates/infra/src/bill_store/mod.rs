//! Bill storage boundary.
//!
//! This module defines the storage collaborator used by the billing service:
//! insert-with-generated-id plus equality lookups by id and customer identity.
//! Nothing here depends on a particular query language.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryBillStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresBillStore;
pub use r#trait::{BillStore, StoreError};
