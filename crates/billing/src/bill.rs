use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_core::{BillId, DomainError, DomainResult};

use crate::customer::CustomerProfile;
use crate::discount::{DiscountBreakdown, DiscountLine};
use crate::item::LineItem;
use crate::request::BillRequest;

/// A priced bill.
///
/// Created in memory per request, persisted once, then only read. The `id`
/// is absent until the storage layer assigns it and can be assigned only once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<BillId>,
    customer: CustomerProfile,
    items: Vec<LineItem>,
    total_amount: Decimal,
    net_payable_amount: Decimal,
    bill_date: DateTime<Utc>,
    discounts: [DiscountLine; 2],
}

impl Bill {
    /// Build an unpersisted bill from a request and its computed figures.
    pub fn assemble(request: BillRequest, breakdown: DiscountBreakdown, bill_date: DateTime<Utc>) -> Self {
        let (items, customer) = request.into_parts();
        Self {
            id: None,
            customer,
            items,
            total_amount: breakdown.total_amount,
            net_payable_amount: breakdown.net_payable_amount,
            bill_date,
            discounts: breakdown.discounts,
        }
    }

    /// Attach the storage-assigned identity.
    pub fn assign_id(mut self, id: BillId) -> DomainResult<Self> {
        if let Some(existing) = self.id {
            return Err(DomainError::conflict(format!("bill already has id {existing}")));
        }
        self.id = Some(id);
        Ok(self)
    }

    pub fn id(&self) -> Option<BillId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn customer(&self) -> &CustomerProfile {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn net_payable_amount(&self) -> Decimal {
        self.net_payable_amount
    }

    pub fn bill_date(&self) -> DateTime<Utc> {
        self.bill_date
    }

    /// `[customer-type, price]`.
    pub fn discounts(&self) -> &[DiscountLine] {
        &self.discounts
    }
}
