use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchased product line: name, unit price and quantity.
///
/// Quantities are decimal so weighed goods can be billed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(rename = "productName")]
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// `unit_price * quantity` at full precision (never rounded here).
    pub fn item_total(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}
