//! Presumed-credit recalculation for a single invoice line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::tables::{delta_percent, percent_of_icms};
use crate::core::{AuditContext, CalculationMode, CreditOutcome, InvoiceLine, LineAudit};

/// Recalculate the presumed credit of `line`.
///
/// The mode is chosen by comparing the product value to the ICMS base:
///
/// - different → [`CalculationMode::Delta`]:
///   `vICMS - percent * vProd / 100`
/// - equal → [`CalculationMode::PercentOfIcms`]:
///   `vICMS * percent / 100`
///
/// A rate missing from the selected table yields
/// [`CreditOutcome::UnclassifiedRate`]; a credit or difference that does not
/// fit in a [`Decimal`] yields [`CreditOutcome::OutOfRange`]. All arithmetic
/// is unrounded.
pub fn recalculate(line: &InvoiceLine, ctx: &AuditContext) -> LineAudit {
    let mode = CalculationMode::for_line(line);
    let rate = line.icms_rate_percent;

    let percent = match mode {
        CalculationMode::Delta => delta_percent(rate),
        CalculationMode::PercentOfIcms => percent_of_icms(rate, &line.ncm_code, ctx),
    };

    let outcome = match percent {
        Some(presumed_credit_percent) => {
            let credit = credit_for(mode, line, presumed_credit_percent);
            let difference =
                credit.and_then(|c| c.checked_sub(line.declared_presumed_credit).map(|d| (c, d)));
            match difference {
                Some((recalculated_credit, difference)) => {
                    tracing::debug!(
                        item = %line.item_number,
                        ?mode,
                        %rate,
                        percent = %presumed_credit_percent,
                        "presumed credit recalculated"
                    );
                    CreditOutcome::Classified {
                        presumed_credit_percent,
                        recalculated_credit,
                        difference,
                    }
                }
                None => {
                    tracing::warn!(
                        item = %line.item_number,
                        ?mode,
                        percent = %presumed_credit_percent,
                        "presumed credit out of decimal range"
                    );
                    CreditOutcome::OutOfRange {
                        presumed_credit_percent,
                    }
                }
            }
        }
        None => {
            tracing::debug!(item = %line.item_number, ?mode, %rate, "ICMS rate not in TTD table");
            CreditOutcome::UnclassifiedRate
        }
    };

    LineAudit {
        line: line.clone(),
        mode,
        outcome,
    }
}

/// Apply the formula of `mode`; `None` on overflow.
fn credit_for(mode: CalculationMode, line: &InvoiceLine, percent: Decimal) -> Option<Decimal> {
    match mode {
        CalculationMode::Delta => {
            let share = percent
                .checked_mul(line.product_value)?
                .checked_div(dec!(100))?;
            line.icms_value.checked_sub(share)
        }
        CalculationMode::PercentOfIcms => line
            .icms_value
            .checked_mul(percent)?
            .checked_div(dec!(100)),
    }
}

/// Recalculate every line, preserving order.
pub fn recalculate_all(lines: &[InvoiceLine], ctx: &AuditContext) -> Vec<LineAudit> {
    lines.iter().map(|line| recalculate(line, ctx)).collect()
}
