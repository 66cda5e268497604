use rust_decimal::Decimal;

use retail_core::{DomainError, DomainResult};

use crate::customer::CustomerProfile;
use crate::item::LineItem;

/// A validated request to bill `items` to `customer`.
///
/// Construction enforces everything the discount engine assumes about its
/// inputs, so a `BillRequest` can always be priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillRequest {
    items: Vec<LineItem>,
    customer: CustomerProfile,
}

impl BillRequest {
    pub fn new(items: Vec<LineItem>, customer: CustomerProfile) -> DomainResult<Self> {
        validate_items(&items)?;
        if customer.identity.trim().is_empty() {
            return Err(DomainError::validation("customer identity is required"));
        }
        Ok(Self { items, customer })
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn customer(&self) -> &CustomerProfile {
        &self.customer
    }

    pub fn into_parts(self) -> (Vec<LineItem>, CustomerProfile) {
        (self.items, self.customer)
    }
}

/// Reject empty bills, items with a negative price or non-positive quantity,
/// and baskets whose total cannot be carried at two fractional digits.
pub fn validate_items(items: &[LineItem]) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::validation("bill items are required"));
    }

    let mut total = Decimal::ZERO;
    for item in items {
        if item.quantity <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "item '{}' must have a positive quantity",
                item.name
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "item '{}' must have a non-negative unit price",
                item.name
            )));
        }

        total = item
            .unit_price
            .checked_mul(item.quantity)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(out_of_range)?;
    }

    // Every money checkpoint rescales to two digits; keep headroom for that.
    total.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(out_of_range)?;

    Ok(())
}

fn out_of_range() -> DomainError {
    DomainError::validation("bill total is out of range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerType;
    use chrono::Utc;

    fn test_customer(identity: &str) -> CustomerProfile {
        CustomerProfile::new(identity, "John Doe", CustomerType::Regular, Utc::now())
    }

    fn item(price: i64, qty: i64) -> LineItem {
        LineItem::new("Widget", Decimal::new(price, 2), Decimal::new(qty, 0))
    }

    #[test]
    fn accepts_well_formed_request() {
        let req = BillRequest::new(vec![item(1000, 1), item(0, 2)], test_customer("ID001")).unwrap();
        assert_eq!(req.items().len(), 2);
        assert_eq!(req.customer().identity, "ID001");
    }

    #[test]
    fn rejects_empty_items() {
        let err = BillRequest::new(vec![], test_customer("ID001")).unwrap_err();
        assert_eq!(err, DomainError::validation("bill items are required"));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let err = BillRequest::new(vec![item(1000, 0)], test_customer("ID001")).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("positive quantity") => {}
            other => panic!("Expected Validation for quantity, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_unit_price() {
        let err = BillRequest::new(vec![item(-1, 1)], test_customer("ID001")).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("non-negative unit price") => {}
            other => panic!("Expected Validation for unit price, got {other:?}"),
        }
    }

    #[test]
    fn rejects_line_total_that_overflows() {
        let huge = LineItem::new("Yacht", Decimal::MAX, Decimal::TWO);
        let err = BillRequest::new(vec![huge], test_customer("ID001")).unwrap_err();
        assert_eq!(err, DomainError::validation("bill total is out of range"));
    }

    #[test]
    fn rejects_basket_sum_that_overflows() {
        let half = LineItem::new("Yacht", Decimal::MAX, Decimal::ONE);
        let err = BillRequest::new(vec![half.clone(), half], test_customer("ID001")).unwrap_err();
        assert_eq!(err, DomainError::validation("bill total is out of range"));
    }

    #[test]
    fn accepted_large_basket_can_be_priced() {
        let price = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000_000, 2);
        let req = BillRequest::new(vec![LineItem::new("Jet", price, Decimal::TWO)], test_customer("ID001")).unwrap();

        let breakdown = crate::discount::compute(req.items(), req.customer(), Utc::now());
        assert_eq!(breakdown.total_amount, price * Decimal::TWO);
    }

    #[test]
    fn rejects_blank_customer_identity() {
        let err = BillRequest::new(vec![item(1000, 1)], test_customer("   ")).unwrap_err();
        assert_eq!(err, DomainError::validation("customer identity is required"));
    }
}
