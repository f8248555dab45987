//! Marginal tax calculation.
//!
//! # Responsibilities
//! - Apply each bracket's rate to the slice of income inside it
//! - Produce an itemized breakdown for brackets that contributed
//! - Derive the effective rate for the response layer
//!
//! # Design Decisions
//! - Brackets are walked in the order given; the walk stops at the first
//!   bracket whose minimum the income does not exceed
//! - Per-entry tax is rounded for display, the total accumulates unrounded
//!   values and is rounded once, so entries may not sum exactly to the total

use rust_decimal::Decimal;

use crate::tax::bracket::{TaxBracket, TaxBreakdownEntry, TaxResult};
use crate::tax::rounding::{round_currency, round_rate};

/// Compute total tax owed on `income` under `brackets`.
///
/// An unbounded bracket's ceiling is the income itself. Income at or below
/// the first bracket's minimum owes nothing.
pub fn calculate(income: Decimal, brackets: &[TaxBracket]) -> TaxResult {
    let mut total_tax = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for bracket in brackets {
        let min_income = bracket.min;
        let max_income = bracket.max.unwrap_or(income);

        if income <= min_income {
            break;
        }

        let taxable_income = income.min(max_income) - min_income;
        if taxable_income <= Decimal::ZERO {
            continue;
        }

        let tax = taxable_income * bracket.rate;
        total_tax += tax;

        tracing::debug!(
            min = %min_income,
            max = %max_income,
            rate = %bracket.rate,
            taxable = %taxable_income,
            tax = %tax,
            "Bracket applied"
        );

        breakdown.push(TaxBreakdownEntry {
            min: min_income,
            max: bracket.max,
            rate: bracket.rate,
            taxable_income,
            tax: round_currency(tax),
        });
    }

    TaxResult {
        total_tax: round_currency(total_tax),
        breakdown,
    }
}

/// `total_tax / income` rounded to four places. `None` for non-positive income.
pub fn effective_rate(total_tax: Decimal, income: Decimal) -> Option<Decimal> {
    if income <= Decimal::ZERO {
        return None;
    }
    total_tax.checked_div(income).map(round_rate)
}
