//! Decimal rounding helpers
//!
//! All monetary and volume computations use rust_decimal with explicit
//! per-asset accuracy. Settlement amounts round half-up; reservation
//! amounts round away from zero so a reservation always covers the order
//! it backs.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `accuracy` decimal places, midpoint away from zero (half-up)
pub fn round_half_up(value: Decimal, accuracy: u32) -> Decimal {
    value.round_dp_with_strategy(accuracy, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to `accuracy` decimal places, away from zero
///
/// Used for reservation amounts: the reserved balance must never be less
/// than what a full fill of the remaining volume can cost.
pub fn round_up(value: Decimal, accuracy: u32) -> Decimal {
    value.round_dp_with_strategy(accuracy, RoundingStrategy::AwayFromZero)
}

/// Smallest representable volume at the given accuracy (`10^-accuracy`)
pub fn quantum(accuracy: u32) -> Decimal {
    Decimal::new(1, accuracy)
}
