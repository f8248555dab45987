//! Rounding helpers shared by the calculator and the HTTP layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Decimal places kept for the effective tax rate.
pub const RATE_DP: u32 = 4;

/// Round a currency amount to cents, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a ratio to four decimal places, half away from zero.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_midpoint_goes_up() {
        assert_eq!(round_currency(dec!(123.455)), dec!(123.46));
        assert_eq!(round_currency(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn test_round_currency_keeps_exact_values() {
        assert_eq!(round_currency(dec!(10000)), dec!(10000));
        assert_eq!(round_currency(dec!(0.1)), dec!(0.1));
    }

    #[test]
    fn test_round_rate_four_places() {
        assert_eq!(round_rate(dec!(0.133333)), dec!(0.1333));
        assert_eq!(round_rate(dec!(0.12345)), dec!(0.1235));
    }
}
