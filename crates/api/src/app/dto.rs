//! Request DTOs and their mapping onto domain types.
//!
//! Every inbound field is optional here so that a missing value becomes a
//! `validation_error` response instead of a JSON rejection.

use rust_decimal::Decimal;
use serde::Deserialize;

use retail_billing::{
    BillRequest, CustomerProfile, CustomerType, LineItem, parse_registration_date, validate_items,
};
use retail_core::{DomainError, DomainResult};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    #[serde(default)]
    pub items: Option<Vec<BillItemRequest>>,
    #[serde(default)]
    pub customer: Option<CustomerRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
}

// -------------------------
// DTO -> domain
// -------------------------

impl CreateBillRequest {
    /// Validate and convert: items first, then the customer, then the
    /// registration date.
    pub fn into_domain(self) -> DomainResult<BillRequest> {
        let items = self
            .items
            .unwrap_or_default()
            .into_iter()
            .map(BillItemRequest::into_domain)
            .collect::<DomainResult<Vec<_>>>()?;
        validate_items(&items)?;

        let customer = self
            .customer
            .ok_or_else(|| DomainError::validation("customer is required"))?
            .into_domain()?;

        BillRequest::new(items, customer)
    }
}

impl BillItemRequest {
    fn into_domain(self) -> DomainResult<LineItem> {
        let name = self.product_name.unwrap_or_default();
        let unit_price = self.unit_price.ok_or_else(|| {
            DomainError::validation(format!("item '{name}' must have a unit price"))
        })?;
        let quantity = self.quantity.ok_or_else(|| {
            DomainError::validation(format!("item '{name}' must have a quantity"))
        })?;
        Ok(LineItem::new(name, unit_price, quantity))
    }
}

impl CustomerRequest {
    fn into_domain(self) -> DomainResult<CustomerProfile> {
        let identity = self.identity.unwrap_or_default();
        if identity.trim().is_empty() {
            return Err(DomainError::validation("customer identity is required"));
        }

        let raw_date = self
            .registration_date
            .ok_or_else(|| DomainError::validation("customer registration date is required"))?;
        let registered_at = parse_registration_date(&raw_date)?;

        Ok(CustomerProfile::new(
            identity,
            self.name.unwrap_or_default(),
            CustomerType::parse(self.customer_type.as_deref()),
            registered_at,
        ))
    }
}
