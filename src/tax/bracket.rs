//! Bracket and result types.
//!
//! `TaxBracket` is what the provider sends; `TaxBreakdownEntry` and `TaxResult`
//! are what the calculator produces. All three are plain values created per
//! request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contiguous income range taxed at a single marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the range.
    pub min: Decimal,

    /// Upper bound of the range. `None` marks the unbounded top bracket.
    #[serde(default)]
    pub max: Option<Decimal>,

    /// Marginal rate as a fraction (0.2 = 20%).
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(min: Decimal, max: Option<Decimal>, rate: Decimal) -> Self {
        Self { min, max, rate }
    }

    /// Whether this is the open-ended top bracket.
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// Tax attributed to a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of income falling inside this bracket.
    pub taxable_income: Decimal,
    /// Tax for this bracket, rounded to cents.
    pub tax: Decimal,
}

/// Outcome of a marginal tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Sum of unrounded per-bracket tax, rounded to cents once at the end.
    pub total_tax: Decimal,
    pub breakdown: Vec<TaxBreakdownEntry>,
}

impl TaxResult {
    /// A result with no tax owed.
    pub fn zero() -> Self {
        Self {
            total_tax: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }
}

/// Structural problems in a bracket schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("bracket {index}: minimum {min} is negative")]
    NegativeMin { index: usize, min: Decimal },

    #[error("bracket {index}: rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index}: maximum {max} is below minimum {min}")]
    InvertedRange { index: usize, min: Decimal, max: Decimal },

    #[error("bracket {index}: only the last bracket may be unbounded")]
    UnboundedNotLast { index: usize },

    #[error("bracket {index}: minimum {min} does not ascend past previous minimum {previous_min}")]
    NotAscending {
        index: usize,
        min: Decimal,
        previous_min: Decimal,
    },

    #[error("bracket {index}: minimum {min} overlaps previous maximum {previous_max}")]
    Overlap {
        index: usize,
        min: Decimal,
        previous_max: Decimal,
    },
}

/// Check that a schedule is safe to feed to the calculator.
///
/// The calculator stops at the first bracket whose minimum reaches the income,
/// so an unsorted schedule silently under-taxes. This rejects such input
/// instead of reordering it. An empty schedule is valid.
pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), ScheduleError> {
    let last = brackets.len().saturating_sub(1);

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.min < Decimal::ZERO {
            return Err(ScheduleError::NegativeMin {
                index,
                min: bracket.min,
            });
        }

        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(ScheduleError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.max {
            Some(max) if max < bracket.min => {
                return Err(ScheduleError::InvertedRange {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            None if index != last => {
                return Err(ScheduleError::UnboundedNotLast { index });
            }
            _ => {}
        }

        if index > 0 {
            let previous = &brackets[index - 1];
            if bracket.min <= previous.min {
                return Err(ScheduleError::NotAscending {
                    index,
                    min: bracket.min,
                    previous_min: previous.min,
                });
            }
            if let Some(previous_max) = previous.max {
                if bracket.min < previous_max {
                    return Err(ScheduleError::Overlap {
                        index,
                        min: bracket.min,
                        previous_max,
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn federal() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), Some(dec!(50000)), dec!(0.1)),
            TaxBracket::new(dec!(50000), Some(dec!(100000)), dec!(0.2)),
            TaxBracket::new(dec!(100000), None, dec!(0.3)),
        ]
    }

    #[test]
    fn test_deserialize_without_max() {
        let bracket: TaxBracket =
            serde_json::from_str(r#"{"min": 100000, "rate": 0.3}"#).unwrap();
        assert_eq!(bracket, TaxBracket::new(dec!(100000), None, dec!(0.3)));
        assert!(bracket.is_unbounded());
    }

    #[test]
    fn test_deserialize_null_max() {
        let bracket: TaxBracket =
            serde_json::from_str(r#"{"min": 0, "max": null, "rate": 0.15}"#).unwrap();
        assert_eq!(bracket.max, None);
        assert_eq!(bracket.rate, dec!(0.15));
    }

    #[test]
    fn test_deserialize_missing_rate_fails() {
        let result = serde_json::from_str::<TaxBracket>(r#"{"min": 0, "max": 10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_schedule() {
        assert_eq!(validate_schedule(&federal()), Ok(()));
        assert_eq!(validate_schedule(&[]), Ok(()));
    }

    #[test]
    fn test_unsorted_schedule_rejected() {
        let mut brackets = federal();
        brackets.swap(0, 1);
        // The unbounded bracket is still last, so ordering is what trips.
        assert!(matches!(
            validate_schedule(&brackets),
            Err(ScheduleError::NotAscending { index: 1, .. })
        ));
    }

    #[test]
    fn test_unbounded_in_middle_rejected() {
        let brackets = vec![
            TaxBracket::new(dec!(0), None, dec!(0.1)),
            TaxBracket::new(dec!(50000), Some(dec!(100000)), dec!(0.2)),
        ];
        assert_eq!(
            validate_schedule(&brackets),
            Err(ScheduleError::UnboundedNotLast { index: 0 })
        );
    }

    #[test]
    fn test_overlap_rejected() {
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(60000)), dec!(0.1)),
            TaxBracket::new(dec!(50000), None, dec!(0.2)),
        ];
        assert!(matches!(
            validate_schedule(&brackets),
            Err(ScheduleError::Overlap { index: 1, .. })
        ));
    }

    #[test]
    fn test_rate_and_bounds_checked() {
        let negative = vec![TaxBracket::new(dec!(-1), None, dec!(0.1))];
        assert!(matches!(
            validate_schedule(&negative),
            Err(ScheduleError::NegativeMin { index: 0, .. })
        ));

        let too_high = vec![TaxBracket::new(dec!(0), None, dec!(1.5))];
        assert!(matches!(
            validate_schedule(&too_high),
            Err(ScheduleError::RateOutOfRange { index: 0, .. })
        ));

        let inverted = vec![TaxBracket::new(dec!(100), Some(dec!(50)), dec!(0.1))];
        assert!(matches!(
            validate_schedule(&inverted),
            Err(ScheduleError::InvertedRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ScheduleError::UnboundedNotLast { index: 2 };
        assert_eq!(err.to_string(), "bracket 2: only the last bracket may be unbounded");
    }
}
