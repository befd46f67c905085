use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::ItemWarning;

/// Placeholder for identifier and code fields missing from the document.
pub const NOT_AVAILABLE: &str = "N/A";

/// One product/service line (`det`) of an NF-e.
///
/// Every field is populated: absent numeric fields are zero and absent
/// identifiers are [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// `det/@nItem`: 1-based position in the invoice.
    pub item_number: String,
    /// `NCM`: Mercosur tariff classification (8 digits).
    pub ncm_code: String,
    /// `pICMS`: declared ICMS rate in percent.
    pub icms_rate_percent: Decimal,
    /// `vICMS`: declared ICMS amount.
    pub icms_value: Decimal,
    /// `vProd`: total product value of the line.
    pub product_value: Decimal,
    /// `vBC`: ICMS taxable base.
    pub icms_base: Decimal,
    /// `cBenef`: tax-benefit code.
    pub benefit_code: String,
    /// `gCred/vCredPresumido`: presumed credit declared by the issuer.
    pub declared_presumed_credit: Decimal,
}

impl Default for InvoiceLine {
    fn default() -> Self {
        Self {
            item_number: NOT_AVAILABLE.into(),
            ncm_code: NOT_AVAILABLE.into(),
            icms_rate_percent: Decimal::ZERO,
            icms_value: Decimal::ZERO,
            product_value: Decimal::ZERO,
            icms_base: Decimal::ZERO,
            benefit_code: NOT_AVAILABLE.into(),
            declared_presumed_credit: Decimal::ZERO,
        }
    }
}

/// Identification data of the audited document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// 44-digit access key (`infNFe/@Id` without the `NFe` prefix).
    pub access_key: Option<String>,
    /// `ide/nNF`.
    pub number: Option<String>,
    /// `ide/serie`.
    pub series: Option<String>,
    /// `ide/dhEmi` (or `ide/dEmi` on older layouts).
    pub issue_date: Option<NaiveDate>,
    /// `emit/CNPJ`.
    pub issuer_cnpj: Option<String>,
    /// `emit/xNome`.
    pub issuer_name: Option<String>,
    /// `dest/xNome`.
    pub recipient_name: Option<String>,
}

/// How the presumed credit of a line is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMode {
    /// ICMS base differs from the product value:
    /// `vICMS - percent * vProd / 100`.
    Delta,
    /// ICMS base equals the product value:
    /// `vICMS * percent / 100`.
    PercentOfIcms,
}

impl CalculationMode {
    /// Select the mode for a line.
    pub fn for_line(line: &InvoiceLine) -> Self {
        if line.product_value != line.icms_base {
            CalculationMode::Delta
        } else {
            CalculationMode::PercentOfIcms
        }
    }
}

/// Result of the percentage lookup for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreditOutcome {
    /// The ICMS rate matched a table entry.
    Classified {
        presumed_credit_percent: Decimal,
        recalculated_credit: Decimal,
        /// `recalculated_credit - declared_presumed_credit`.
        difference: Decimal,
    },
    /// The ICMS rate is not covered by the TTD tables.
    UnclassifiedRate,
    /// A percentage was selected but the credit or the difference does not
    /// fit in a [`Decimal`].
    OutOfRange { presumed_credit_percent: Decimal },
}

/// A line together with its recalculated presumed credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAudit {
    pub line: InvoiceLine,
    pub mode: CalculationMode,
    pub outcome: CreditOutcome,
}

impl LineAudit {
    pub fn presumed_credit_percent(&self) -> Option<Decimal> {
        match self.outcome {
            CreditOutcome::Classified {
                presumed_credit_percent,
                ..
            }
            | CreditOutcome::OutOfRange {
                presumed_credit_percent,
            } => Some(presumed_credit_percent),
            CreditOutcome::UnclassifiedRate => None,
        }
    }

    pub fn recalculated_credit(&self) -> Option<Decimal> {
        match self.outcome {
            CreditOutcome::Classified {
                recalculated_credit,
                ..
            } => Some(recalculated_credit),
            _ => None,
        }
    }

    pub fn difference(&self) -> Option<Decimal> {
        match self.outcome {
            CreditOutcome::Classified { difference, .. } => Some(difference),
            _ => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self.outcome, CreditOutcome::Classified { .. })
    }
}

/// Full result of auditing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub header: InvoiceHeader,
    /// One entry per extracted line, in document order.
    pub lines: Vec<LineAudit>,
    /// Line items excluded from `lines`.
    pub warnings: Vec<ItemWarning>,
}

/// Aggregated figures of an [`AuditReport`].
///
/// Credit sums cover classified lines only and saturate at the bounds of
/// [`Decimal`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub line_count: usize,
    pub classified_count: usize,
    pub unclassified_count: usize,
    pub out_of_range_count: usize,
    pub warning_count: usize,
    pub declared_credit_total: Decimal,
    pub recalculated_credit_total: Decimal,
    pub difference_total: Decimal,
}

impl AuditReport {
    /// Compute totals over the report.
    pub fn summary(&self) -> AuditSummary {
        let mut summary = AuditSummary {
            line_count: self.lines.len(),
            warning_count: self.warnings.len(),
            ..Default::default()
        };
        for audit in &self.lines {
            match audit.outcome {
                CreditOutcome::Classified {
                    recalculated_credit,
                    difference,
                    ..
                } => {
                    summary.classified_count += 1;
                    summary.declared_credit_total = summary
                        .declared_credit_total
                        .saturating_add(audit.line.declared_presumed_credit);
                    summary.recalculated_credit_total = summary
                        .recalculated_credit_total
                        .saturating_add(recalculated_credit);
                    summary.difference_total = summary.difference_total.saturating_add(difference);
                }
                CreditOutcome::UnclassifiedRate => summary.unclassified_count += 1,
                CreditOutcome::OutOfRange { .. } => summary.out_of_range_count += 1,
            }
        }
        summary
    }

    /// Lines whose rounded difference is not zero.
    pub fn discrepancies(&self) -> impl Iterator<Item = &LineAudit> {
        self.lines
            .iter()
            .filter(|a| a.difference().is_some_and(|d| !round_money(d).is_zero()))
    }
}

/// Round to 2 decimal places, half away from zero (commercial rounding).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
