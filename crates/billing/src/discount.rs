//! Discount engine.
//!
//! Turns line items and a customer profile into a total, an itemized discount
//! breakdown and a net payable amount. Pure and synchronous: the evaluation
//! time is an argument, there is no IO and no shared state.
//!
//! Rounding happens at exactly two kinds of checkpoints: the summed total, and
//! each discount amount. Per-item totals are never rounded.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_core::money::{percent_of, percentage_label, round2, truncate2};

use crate::customer::{CustomerProfile, CustomerType};
use crate::item::LineItem;

/// 30% for employees.
const EMPLOYEE_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
/// 10% for affiliates.
const AFFILIATE_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// 5% for long-standing customers without a tier discount.
const LOYALTY_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// Customers registered longer than this earn the loyalty discount.
const LOYALTY_TENURE_MONTHS: u32 = 24;

/// Totals above this amount earn the bulk discount.
const BULK_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Bulk discount granted per `BULK_THRESHOLD` spent.
const BULK_AMOUNT_PER_STEP: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Which rule produced a discount line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Tier (employee/affiliate) or loyalty discount.
    CustomerTypeDiscount,
    /// Bulk discount on the bill total.
    PriceDiscount,
}

/// One itemized discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountLine {
    pub amount: Decimal,
    pub kind: DiscountKind,
    /// Share of the bill total, e.g. `30.00%`.
    pub percentage_label: String,
}

impl DiscountLine {
    fn new(kind: DiscountKind, amount: Decimal, total_amount: Decimal) -> Self {
        Self {
            amount,
            kind,
            percentage_label: percentage_label(amount, total_amount),
        }
    }
}

/// Engine output.
///
/// `discounts` is always `[customer-type, price]`, zero amounts included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountBreakdown {
    pub total_amount: Decimal,
    pub discounts: [DiscountLine; 2],
    pub net_payable_amount: Decimal,
}

impl DiscountBreakdown {
    pub fn customer_type_discount(&self) -> &DiscountLine {
        let [customer_type, _] = &self.discounts;
        customer_type
    }

    pub fn price_discount(&self) -> &DiscountLine {
        let [_, price] = &self.discounts;
        price
    }

    pub fn total_discount(&self) -> Decimal {
        self.discounts.iter().map(|d| d.amount).sum()
    }
}

/// Compute totals and discounts for `items` bought by `customer` at `now`.
///
/// # Panics
///
/// Panics if an item has a negative unit price or a non-positive quantity.
/// Callers validate requests before they reach the engine.
pub fn compute(items: &[LineItem], customer: &CustomerProfile, now: DateTime<Utc>) -> DiscountBreakdown {
    assert_valid_items(items);

    let total_amount = original_amount(items);
    let customer_discount = customer_type_discount(customer, total_amount, now);
    let price_discount = bulk_discount(total_amount);

    let net_payable_amount = round2((total_amount - (customer_discount + price_discount)).max(Decimal::ZERO));

    DiscountBreakdown {
        total_amount,
        discounts: [
            DiscountLine::new(DiscountKind::CustomerTypeDiscount, customer_discount, total_amount),
            DiscountLine::new(DiscountKind::PriceDiscount, price_discount, total_amount),
        ],
        net_payable_amount,
    }
}

/// Sum of all item totals, rounded half-up to two digits once at the end.
pub fn original_amount(items: &[LineItem]) -> Decimal {
    round2(items.iter().map(LineItem::item_total).sum())
}

/// Tier discount for employees and affiliates, falling back to the loyalty
/// discount when the tier yields nothing.
pub fn customer_type_discount(customer: &CustomerProfile, total_amount: Decimal, now: DateTime<Utc>) -> Decimal {
    let tier = match customer.customer_type {
        CustomerType::Employee => percent_of(total_amount, EMPLOYEE_RATE),
        CustomerType::Affiliate => percent_of(total_amount, AFFILIATE_RATE),
        CustomerType::Regular | CustomerType::Other(_) => round2(Decimal::ZERO),
    };

    if tier.is_zero() && is_long_standing(customer.registered_at, now) {
        return percent_of(total_amount, LOYALTY_RATE);
    }

    tier
}

/// `truncate2(total / 100) * 5` for totals above 100, zero otherwise.
pub fn bulk_discount(total_amount: Decimal) -> Decimal {
    if total_amount <= BULK_THRESHOLD {
        return round2(Decimal::ZERO);
    }
    truncate2(total_amount / BULK_THRESHOLD) * BULK_AMOUNT_PER_STEP
}

fn is_long_standing(registered_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.checked_sub_months(Months::new(LOYALTY_TENURE_MONTHS))
        .is_some_and(|cutoff| registered_at < cutoff)
}

fn assert_valid_items(items: &[LineItem]) {
    for item in items {
        assert!(
            item.unit_price >= Decimal::ZERO,
            "line item '{}' has negative unit price {}",
            item.name,
            item.unit_price
        );
        assert!(
            item.quantity > Decimal::ZERO,
            "line item '{}' has non-positive quantity {}",
            item.name,
            item.quantity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core::str::FromStr;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn customer(ty: CustomerType, registered_at: DateTime<Utc>) -> CustomerProfile {
        CustomerProfile::new("ID001", "John Doe", ty, registered_at)
    }

    fn laptop_and_mice() -> Vec<LineItem> {
        vec![
            LineItem::new("Gaming Laptop", dec("1000.00"), dec("1")),
            LineItem::new("Wireless Mouse", dec("50.00"), dec("2")),
        ]
    }

    fn assert_figures(b: &DiscountBreakdown, total: &str, tier: &str, bulk: &str, net: &str) {
        assert_eq!(b.total_amount, dec(total), "total");
        assert_eq!(b.customer_type_discount().amount, dec(tier), "customer type discount");
        assert_eq!(b.price_discount().amount, dec(bulk), "price discount");
        assert_eq!(b.net_payable_amount, dec(net), "net payable");
    }

    #[test]
    fn employee_gets_thirty_percent_plus_bulk() {
        let now = test_now();
        let c = customer(CustomerType::Employee, now - Duration::days(30));

        let b = compute(&laptop_and_mice(), &c, now);

        assert_figures(&b, "1100.00", "330.00", "55.00", "715.00");
        assert_eq!(b.customer_type_discount().percentage_label, "30.00%");
        assert_eq!(b.price_discount().percentage_label, "5.00%");
    }

    #[test]
    fn affiliate_gets_ten_percent_plus_bulk() {
        let now = test_now();
        let c = customer(CustomerType::Affiliate, now - Duration::days(30));

        let b = compute(&laptop_and_mice(), &c, now);

        assert_figures(&b, "1100.00", "110.00", "55.00", "935.00");
    }

    #[test]
    fn long_standing_regular_gets_loyalty_discount() {
        let now = test_now();
        let c = customer(CustomerType::Regular, now - Duration::days(3 * 365));

        let b = compute(&laptop_and_mice(), &c, now);

        assert_figures(&b, "1100.00", "55.00", "55.00", "990.00");
    }

    #[test]
    fn recent_regular_gets_bulk_only() {
        let now = test_now();
        let c = customer(CustomerType::Regular, now - Duration::days(180));

        let b = compute(&laptop_and_mice(), &c, now);

        assert_figures(&b, "1100.00", "0", "55.00", "1045.00");
    }

    #[test]
    fn unknown_type_is_treated_like_regular() {
        let now = test_now();
        let recent = customer(CustomerType::Other("Gold".into()), now - Duration::days(180));
        let veteran = customer(CustomerType::Other("Gold".into()), now - Duration::days(1000));

        assert_figures(&compute(&laptop_and_mice(), &recent, now), "1100.00", "0", "55.00", "1045.00");
        assert_figures(&compute(&laptop_and_mice(), &veteran, now), "1100.00", "55.00", "55.00", "990.00");
    }

    #[test]
    fn long_standing_employee_does_not_stack_loyalty() {
        let now = test_now();
        let c = customer(CustomerType::Employee, now - Duration::days(10 * 365));

        let b = compute(&laptop_and_mice(), &c, now);

        assert_figures(&b, "1100.00", "330.00", "55.00", "715.00");
    }

    #[test]
    fn small_bill_has_no_bulk_discount() {
        let now = test_now();
        let c = customer(CustomerType::Employee, now - Duration::days(30));
        let items = vec![
            LineItem::new("Small Item", dec("30.00"), dec("1")),
            LineItem::new("Another Item", dec("40.00"), dec("1")),
        ];

        let b = compute(&items, &c, now);

        assert_figures(&b, "70.00", "21.00", "0", "49.00");
    }

    #[test]
    fn exactly_one_hundred_has_no_bulk_discount() {
        assert_eq!(bulk_discount(dec("100.00")), Decimal::ZERO);
        assert_eq!(bulk_discount(dec("100.01")), dec("5.00"));
    }

    #[test]
    fn bulk_discount_truncates_division_to_two_digits() {
        // 150.50 / 100 = 1.505 -> 1.50 -> 7.50 (not 1 * 5)
        assert_eq!(bulk_discount(dec("150.50")), dec("7.50"));
        assert_eq!(bulk_discount(dec("999.99")), dec("49.95"));
    }

    #[test]
    fn empty_bill_is_all_zero() {
        let now = test_now();
        let c = customer(CustomerType::Employee, now - Duration::days(30));

        let b = compute(&[], &c, now);

        assert_figures(&b, "0", "0", "0", "0");
        assert_eq!(b.discounts.len(), 2);
        assert_eq!(b.customer_type_discount().percentage_label, "0%");
    }

    #[test]
    fn total_is_rounded_once_not_per_item() {
        let now = test_now();
        let c = customer(CustomerType::Regular, now);
        // Each item is 0.333 (would round to 0.33); three of them sum to 0.999 -> 1.00.
        let items = vec![
            LineItem::new("a", dec("0.111"), dec("3")),
            LineItem::new("b", dec("0.111"), dec("3")),
            LineItem::new("c", dec("0.111"), dec("3")),
        ];

        let b = compute(&items, &c, now);

        assert_eq!(b.total_amount, dec("1.00"));
        assert_eq!(b.total_amount.to_string(), "1.00");
    }

    #[test]
    fn discounts_are_ordered_customer_type_then_price() {
        let now = test_now();
        let c = customer(CustomerType::Affiliate, now);

        let b = compute(&laptop_and_mice(), &c, now);

        let kinds: Vec<_> = b.discounts.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiscountKind::CustomerTypeDiscount, DiscountKind::PriceDiscount]);
    }

    #[test]
    fn loyalty_requires_strictly_more_than_two_years() {
        let now = test_now();
        let exactly_two_years = now.checked_sub_months(Months::new(24)).unwrap();
        let just_over = exactly_two_years - Duration::seconds(1);

        let at_boundary = customer(CustomerType::Regular, exactly_two_years);
        let past_boundary = customer(CustomerType::Regular, just_over);

        assert_eq!(customer_type_discount(&at_boundary, dec("200.00"), now), Decimal::ZERO);
        assert_eq!(customer_type_discount(&past_boundary, dec("200.00"), now), dec("10.00"));
    }

    #[test]
    fn discount_line_serializes_with_wire_names() {
        let now = test_now();
        let c = customer(CustomerType::Employee, now);
        let b = compute(&laptop_and_mice(), &c, now);

        let json = serde_json::to_value(b.customer_type_discount()).unwrap();
        assert_eq!(json["kind"], "CUSTOMER_TYPE_DISCOUNT");
        assert_eq!(json["amount"], "330.00");
        assert_eq!(json["percentageLabel"], "30.00%");
    }

    #[test]
    #[should_panic(expected = "negative unit price")]
    fn negative_price_is_a_contract_violation() {
        let now = test_now();
        let c = customer(CustomerType::Regular, now);
        compute(&[LineItem::new("refund", dec("-1.00"), dec("1"))], &c, now);
    }

    #[test]
    #[should_panic(expected = "non-positive quantity")]
    fn zero_quantity_is_a_contract_violation() {
        let now = test_now();
        let c = customer(CustomerType::Regular, now);
        compute(&[LineItem::new("ghost", dec("1.00"), Decimal::ZERO)], &c, now);
    }

    fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec(
            (0i64..500_000i64, 1i64..5_000i64).prop_map(|(price_cents, qty_milli)| {
                LineItem::new("item", Decimal::new(price_cents, 2), Decimal::new(qty_milli, 3))
            }),
            0..8,
        )
    }

    fn arb_customer_type() -> impl Strategy<Value = CustomerType> {
        prop_oneof![
            Just(CustomerType::Employee),
            Just(CustomerType::Affiliate),
            Just(CustomerType::Regular),
            "[a-z]{1,8}".prop_map(CustomerType::Other),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the total is the half-up rounded sum of full-precision item totals.
        #[test]
        fn total_is_rounded_sum_of_items(items in arb_items(), ty in arb_customer_type(), days in 0i64..3_000) {
            let now = test_now();
            let c = customer(ty, now - Duration::days(days));

            let b = compute(&items, &c, now);

            let raw: Decimal = items.iter().map(|i| i.unit_price * i.quantity).sum();
            prop_assert_eq!(b.total_amount, round2(raw));
            prop_assert_eq!(b.total_amount.scale(), 2);
        }

        /// Property: net payable is the total minus both discounts and never negative.
        #[test]
        fn net_is_total_minus_discounts(items in arb_items(), ty in arb_customer_type(), days in 0i64..3_000) {
            let now = test_now();
            let c = customer(ty, now - Duration::days(days));

            let b = compute(&items, &c, now);

            prop_assert_eq!(b.net_payable_amount, b.total_amount - b.total_discount());
            prop_assert!(b.net_payable_amount >= Decimal::ZERO);
        }

        /// Property: the bulk discount is zero up to 100 and truncate2(total/100)*5 above it.
        #[test]
        fn bulk_discount_follows_threshold_rule(items in arb_items()) {
            let now = test_now();
            let c = customer(CustomerType::Regular, now);

            let b = compute(&items, &c, now);

            let expected = if b.total_amount <= dec("100") {
                Decimal::ZERO
            } else {
                truncate2(b.total_amount / dec("100")) * dec("5")
            };
            prop_assert_eq!(b.price_discount().amount, expected);
        }

        /// Property: the customer-type line follows the tier rules, with loyalty only as a fallback.
        #[test]
        fn customer_type_discount_follows_tier_rules(items in arb_items(), ty in arb_customer_type(), days in 0i64..3_000) {
            let now = test_now();
            let registered_at = now - Duration::days(days);
            let c = customer(ty.clone(), registered_at);

            let b = compute(&items, &c, now);

            let total = b.total_amount;
            let long_standing = registered_at < now.checked_sub_months(Months::new(24)).unwrap();
            let tier = match ty {
                CustomerType::Employee => round2(total * dec("0.30")),
                CustomerType::Affiliate => round2(total * dec("0.10")),
                _ => Decimal::ZERO,
            };
            let expected = if tier.is_zero() && long_standing {
                round2(total * dec("0.05"))
            } else {
                tier
            };
            prop_assert_eq!(b.customer_type_discount().amount, expected);
        }
    }
}
