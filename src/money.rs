//! Minor-unit money helpers.
//!
//! Every amount in the system is an `i64` count of minor currency units
//! (`*_cent` columns). Percentages arrive as `NUMERIC(5,2)` values and are
//! applied with decimal arithmetic, then rounded half-up back to whole
//! minor units. Conversion to major units happens only at the edge, for
//! report display.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// `round(amount * percent / 100)`, half away from zero.
pub fn percent_of(amount_cent: i64, percent: Decimal) -> i64 {
    if percent.is_zero() || amount_cent == 0 {
        return 0;
    }
    let raw = Decimal::from(amount_cent) * percent / Decimal::ONE_HUNDRED;
    raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Integer division rounded half-up. `den` must be positive.
pub fn div_round_half_up(num: i64, den: i64) -> i64 {
    debug_assert!(den > 0);
    let num = num as i128;
    let den = den as i128;
    let q = (2 * num + den).div_euclid(2 * den);
    q as i64
}

pub fn to_major(cents: i64) -> f64 {
    round2(cents as f64 / 100.0)
}

pub fn to_major_f64(cents: f64) -> f64 {
    round2(cents / 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_of(1000, Decimal::new(19, 0)), 190);
        // 250 * 10% = 25
        assert_eq!(percent_of(250, Decimal::new(10, 0)), 25);
        // 5 * 10% = 0.5 -> 1
        assert_eq!(percent_of(5, Decimal::new(10, 0)), 1);
        // 4 * 10% = 0.4 -> 0
        assert_eq!(percent_of(4, Decimal::new(10, 0)), 0);
        // fractional percentage: 1999 * 12.5% = 249.875 -> 250
        assert_eq!(percent_of(1999, Decimal::new(1250, 2)), 250);
    }

    #[test]
    fn zero_percent_is_zero() {
        assert_eq!(percent_of(123_456, Decimal::ZERO), 0);
    }

    #[test]
    fn half_up_division() {
        assert_eq!(div_round_half_up(12_000, 20), 600);
        assert_eq!(div_round_half_up(5, 2), 3);
        assert_eq!(div_round_half_up(7, 3), 2);
        assert_eq!(div_round_half_up(0, 9), 0);
    }

    #[test]
    fn major_unit_display() {
        assert_eq!(to_major(69_000), 690.0);
        assert_eq!(to_major(12_345), 123.45);
        assert_eq!(to_major_f64(33_333.333), 333.33);
    }
}
