//! Money rounding rules.
//!
//! Monetary values are `Decimal`s carried at full precision until one of the
//! rounding checkpoints below. Every checkpoint yields a value at scale 2, so
//! `1100` and `1100.00` render identically.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Round half-up (away from zero on a tie) to two fractional digits.
pub fn round2(value: Decimal) -> Decimal {
    to_money_scale(value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Truncate toward zero at two fractional digits.
pub fn truncate2(value: Decimal) -> Decimal {
    to_money_scale(value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero))
}

/// `rate` of `amount`, rounded half-up to two fractional digits.
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    round2(amount * rate)
}

/// Render `part` as a share of `whole`, e.g. `30.00%`.
///
/// The ratio is rounded half-up to two digits before scaling to a percentage,
/// so shares are reported in whole-percent steps. A zero `whole` renders as
/// `0%`.
pub fn percentage_label(part: Decimal, whole: Decimal) -> String {
    if whole.is_zero() {
        return "0%".to_string();
    }
    let ratio = round2(part / whole);
    format!("{}%", to_money_scale(ratio * Decimal::ONE_HUNDRED))
}

fn to_money_scale(mut value: Decimal) -> Decimal {
    value.rescale(MONEY_SCALE);
    value
}
