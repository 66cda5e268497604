//! `retail-core` — shared building blocks for the retail discount service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, strongly-typed identifiers and money rounding rules.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::BillId;
