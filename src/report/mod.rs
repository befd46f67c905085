//! Result table for display and spreadsheet export.
//!
//! Turns an [`AuditReport`] into presentation rows (every decimal rounded to
//! two places) in the fixed column order:
//!
//! | # | Column | Source |
//! |---|--------|--------|
//! | 1 | `nItem` | item number |
//! | 2 | `NCM` | tariff code |
//! | 3 | `pICMS` | declared ICMS rate |
//! | 4 | `vICMS` | declared ICMS amount |
//! | 5 | `vProd` | product value |
//! | 6 | `vBC` | ICMS base |
//! | 7 | `Perc Presumido TTD` | selected percentage |
//! | 8 | `Recalculo Cred. Presumido` | recalculated credit |
//! | 9 | `vCredPresumido XML` | declared credit |
//! | 10 | `Diferença` | recalculated − declared |
//! | 11 | `Código cBENEF` | benefit code |
//!
//! Columns 7, 8 and 10 are empty for lines whose ICMS rate is not covered by
//! the TTD tables. Columns 8 and 10 are also empty when the credit is out of
//! decimal range.

mod csv_export;

pub use csv_export::to_csv;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AuditError, AuditReport, LineAudit, round_money};

/// Column headers, in output order.
pub const COLUMNS: [&str; 11] = [
    "nItem",
    "NCM",
    "pICMS",
    "vICMS",
    "vProd",
    "vBC",
    "Perc Presumido TTD",
    "Recalculo Cred. Presumido",
    "vCredPresumido XML",
    "Diferença",
    "Código cBENEF",
];

/// Name of the result table; spreadsheet writers use it as the sheet name.
pub const RESULT_SHEET_NAME: &str = "Resultado";

/// File name (without extension) for exported result tables.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "credito_presumido";

/// One presentation row of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub item_number: String,
    pub ncm_code: String,
    pub icms_rate_percent: Decimal,
    pub icms_value: Decimal,
    pub product_value: Decimal,
    pub icms_base: Decimal,
    pub presumed_credit_percent: Option<Decimal>,
    pub recalculated_credit: Option<Decimal>,
    pub declared_presumed_credit: Decimal,
    pub difference: Option<Decimal>,
    pub benefit_code: String,
}

impl From<&LineAudit> for ResultRow {
    fn from(audit: &LineAudit) -> Self {
        let line = &audit.line;
        Self {
            item_number: line.item_number.clone(),
            ncm_code: line.ncm_code.clone(),
            icms_rate_percent: round_money(line.icms_rate_percent),
            icms_value: round_money(line.icms_value),
            product_value: round_money(line.product_value),
            icms_base: round_money(line.icms_base),
            presumed_credit_percent: audit.presumed_credit_percent().map(round_money),
            recalculated_credit: audit.recalculated_credit().map(round_money),
            declared_presumed_credit: round_money(line.declared_presumed_credit),
            difference: audit.difference().map(round_money),
            benefit_code: line.benefit_code.clone(),
        }
    }
}

/// Presentation rows of `report`, in document order.
pub fn rows(report: &AuditReport) -> Vec<ResultRow> {
    report.lines.iter().map(ResultRow::from).collect()
}

/// Encode the result table as a pretty-printed JSON array.
pub fn to_json(report: &AuditReport) -> Result<String, AuditError> {
    serde_json::to_string_pretty(&rows(report))
        .map_err(|e| AuditError::Export(format!("JSON encoding failed: {e}")))
}
