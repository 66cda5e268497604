//! Retail billing domain module.
//!
//! This crate contains the discount policy and the bill record, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). The
//! current time is always passed in by the caller.

pub mod bill;
pub mod customer;
pub mod discount;
pub mod item;
pub mod request;

pub use bill::Bill;
pub use customer::{CustomerProfile, CustomerType, parse_registration_date};
pub use discount::{DiscountBreakdown, DiscountKind, DiscountLine, compute};
pub use item::LineItem;
pub use request::{BillRequest, validate_items};
