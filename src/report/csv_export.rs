//! CSV encoding of the result table.
//!
//! Semicolon separators, quoted text fields and comma decimal separators, so
//! the file opens directly in a pt-BR spreadsheet.

use rust_decimal::Decimal;

use super::{COLUMNS, ResultRow, rows};
use crate::core::AuditReport;

/// Encode the result table as CSV with a header line.
pub fn to_csv(report: &AuditReport) -> String {
    let mut out = String::new();

    for (i, column) in COLUMNS.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        csv_field_str(&mut out, column);
    }
    out.push_str("\r\n");

    for row in rows(report) {
        write_row(&mut out, &row);
    }
    out
}

fn write_row(out: &mut String, row: &ResultRow) {
    csv_field_str(out, &row.item_number);
    out.push(';');
    csv_field_str(out, &row.ncm_code);
    out.push(';');
    csv_field_decimal(out, row.icms_rate_percent);
    out.push(';');
    csv_field_decimal(out, row.icms_value);
    out.push(';');
    csv_field_decimal(out, row.product_value);
    out.push(';');
    csv_field_decimal(out, row.icms_base);
    out.push(';');
    csv_field_opt_decimal(out, row.presumed_credit_percent);
    out.push(';');
    csv_field_opt_decimal(out, row.recalculated_credit);
    out.push(';');
    csv_field_decimal(out, row.declared_presumed_credit);
    out.push(';');
    csv_field_opt_decimal(out, row.difference);
    out.push(';');
    csv_field_str(out, &row.benefit_code);
    out.push_str("\r\n");
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal) {
    let s = format!("{:.2}", d);
    out.push_str(&s.replace('.', ","));
}

fn csv_field_opt_decimal(out: &mut String, d: Option<Decimal>) {
    if let Some(d) = d {
        csv_field_decimal(out, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimal_uses_comma() {
        let mut s = String::new();
        csv_field_decimal(&mut s, dec!(1234.5));
        assert_eq!(s, "1234,50");
    }

    #[test]
    fn quotes_are_doubled() {
        let mut s = String::new();
        csv_field_str(&mut s, r#"A "B""#);
        assert_eq!(s, r#""A ""B""""#);
    }

    #[test]
    fn empty_report_has_header_only() {
        let csv = to_csv(&AuditReport::default());
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("\"nItem\";\"NCM\";\"pICMS\""));
        assert!(csv.ends_with("\"Código cBENEF\"\r\n"));
    }

    #[test]
    fn unclassified_row_leaves_cells_empty() {
        let report = AuditReport {
            lines: vec![LineAudit {
                line: InvoiceLine {
                    item_number: "1".into(),
                    icms_rate_percent: dec!(17),
                    declared_presumed_credit: dec!(5),
                    ..Default::default()
                },
                mode: CalculationMode::PercentOfIcms,
                outcome: CreditOutcome::UnclassifiedRate,
            }],
            ..Default::default()
        };
        let csv = to_csv(&report);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"1\";\"N/A\";17,00;0,00;0,00;0,00;;;5,00;;\"N/A\"");
    }
}
