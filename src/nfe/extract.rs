use chrono::{DateTime, NaiveDate};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::NFE_NAMESPACE;
use crate::core::*;

/// Lines and header read from one NF-e document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub header: InvoiceHeader,
    /// Successfully read lines, in document order.
    pub lines: Vec<InvoiceLine>,
    /// Lines that were skipped because a field could not be read.
    pub warnings: Vec<ItemWarning>,
}

fn invalid(msg: impl Into<String>) -> AuditError {
    AuditError::InvalidDocument(msg.into())
}

/// Read every `det` element of an NF-e document.
///
/// Only elements bound to the NF-e namespace are considered. A line whose
/// numeric field does not parse is skipped and reported in
/// [`Extraction::warnings`]; the remaining lines are still read.
///
/// # Errors
///
/// [`AuditError::InvalidDocument`] if the input is not UTF-8, is not
/// well-formed XML, or its root element is not in the NF-e namespace.
pub fn extract_lines(xml: &[u8]) -> Result<Extraction, AuditError> {
    let text =
        std::str::from_utf8(xml).map_err(|e| invalid(format!("document is not UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut p = NfeParsed::default();
    // Local names of open elements; foreign-namespace elements are kept as "".
    let mut path: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        let (ns, event) = match reader.read_resolved_event() {
            Ok(resolved) => resolved,
            Err(e) => return Err(invalid(format!("XML parse error: {e}"))),
        };
        let in_nfe_ns =
            matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == NFE_NAMESPACE.as_bytes());

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if path.is_empty() {
                    if saw_root {
                        return Err(invalid("more than one root element"));
                    }
                    if !in_nfe_ns {
                        return Err(invalid(format!(
                            "root element <{}> is not in the NF-e namespace {NFE_NAMESPACE}",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    saw_root = true;
                }

                let name = if in_nfe_ns {
                    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
                } else {
                    String::new()
                };
                p.open(&name, e);

                if matches!(event, Event::Empty(_)) {
                    p.close(&name);
                } else {
                    path.push(name);
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| invalid(format!("XML escape error: {err}")))?;
                if !text.is_empty() && !path.is_empty() {
                    p.handle_text(&path, &text);
                }
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e);
                let text = text.trim();
                if !text.is_empty() && !path.is_empty() {
                    p.handle_text(&path, text);
                }
            }
            Event::End(_) => {
                let ended = path.pop().unwrap_or_default();
                p.close(&ended);
            }
            Event::Eof => {
                if let Some(open) = path.last() {
                    return Err(invalid(format!(
                        "unexpected end of document inside <{open}>"
                    )));
                }
                if !saw_root {
                    return Err(invalid("document has no root element"));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(p.into_extraction())
}

#[derive(Default)]
struct NfeParsed {
    access_key: Option<String>,
    number: Option<String>,
    series: Option<String>,
    issue_date: Option<String>,
    issuer_cnpj: Option<String>,
    issuer_name: Option<String>,
    recipient_name: Option<String>,

    lines: Vec<InvoiceLine>,
    warnings: Vec<ItemWarning>,
    current_line: Option<RawLine>,
}

/// Raw text of one `det`, before numeric parsing.
#[derive(Default)]
struct RawLine {
    item_number: Option<String>,
    ncm: Option<String>,
    icms_rate: Option<String>,
    icms_value: Option<String>,
    product_value: Option<String>,
    icms_base: Option<String>,
    benefit_code: Option<String>,
    declared_credit: Option<String>,
}

/// Keep the first occurrence of a field, like an XPath `.//x` lookup.
fn set_first(slot: &mut Option<String>, text: &str) {
    if slot.is_none() {
        *slot = Some(text.to_string());
    }
}

/// Unescaped, trimmed attribute value; empty values count as absent.
fn attribute(e: &BytesStart<'_>, key: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key.as_bytes() {
            let val = attr.unescape_value().ok()?;
            let val = val.trim();
            if !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

impl NfeParsed {
    fn open(&mut self, name: &str, e: &BytesStart<'_>) {
        match name {
            "det" => {
                self.current_line = Some(RawLine {
                    item_number: attribute(e, "nItem"),
                    ..Default::default()
                });
            }
            "infNFe" if self.access_key.is_none() => {
                self.access_key = attribute(e, "Id")
                    .map(|id| id.strip_prefix("NFe").unwrap_or(&id).to_string());
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        if name != "det" {
            return;
        }
        if let Some(raw) = self.current_line.take() {
            match raw.into_line() {
                Ok(line) => self.lines.push(line),
                Err(warning) => {
                    tracing::warn!(
                        item = %warning.item,
                        field = ?warning.field,
                        "skipping invoice line: {}",
                        warning.message
                    );
                    self.warnings.push(warning);
                }
            }
        }
    }

    fn handle_text(&mut self, path: &[String], text: &str) {
        let leaf = path.last().map(|s| s.as_str()).unwrap_or("");
        let parent = if path.len() >= 2 {
            path[path.len() - 2].as_str()
        } else {
            ""
        };
        let grandparent = if path.len() >= 3 {
            path[path.len() - 3].as_str()
        } else {
            ""
        };

        if let Some(line) = self.current_line.as_mut() {
            let in_icms = path.iter().any(|p| p == "ICMS");
            match leaf {
                "NCM" => set_first(&mut line.ncm, text),
                "vProd" => set_first(&mut line.product_value, text),
                "pICMS" if in_icms => set_first(&mut line.icms_rate, text),
                "vICMS" if in_icms => set_first(&mut line.icms_value, text),
                "vBC" if in_icms => set_first(&mut line.icms_base, text),
                "cBenef" if parent == "prod" => set_first(&mut line.benefit_code, text),
                "vCredPresumido" if parent == "gCred" && grandparent == "prod" => {
                    set_first(&mut line.declared_credit, text)
                }
                _ => {}
            }
            return;
        }

        match (parent, leaf) {
            ("ide", "nNF") => set_first(&mut self.number, text),
            ("ide", "serie") => set_first(&mut self.series, text),
            ("ide", "dhEmi") | ("ide", "dEmi") => set_first(&mut self.issue_date, text),
            ("emit", "CNPJ") => set_first(&mut self.issuer_cnpj, text),
            ("emit", "xNome") => set_first(&mut self.issuer_name, text),
            ("dest", "xNome") => set_first(&mut self.recipient_name, text),
            _ => {}
        }
    }

    fn into_extraction(self) -> Extraction {
        let issue_date = self.issue_date.as_deref().and_then(|raw| {
            let parsed = parse_issue_date(raw);
            if parsed.is_none() {
                tracing::warn!(value = raw, "ignoring unreadable NF-e issue date");
            }
            parsed
        });

        Extraction {
            header: InvoiceHeader {
                access_key: self.access_key,
                number: self.number,
                series: self.series,
                issue_date,
                issuer_cnpj: self.issuer_cnpj,
                issuer_name: self.issuer_name,
                recipient_name: self.recipient_name,
            },
            lines: self.lines,
            warnings: self.warnings,
        }
    }
}

impl RawLine {
    fn into_line(self) -> Result<InvoiceLine, ItemWarning> {
        let item = self
            .item_number
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let icms_rate_percent = parse_field(&item, "pICMS", self.icms_rate.as_deref())?;
        let icms_value = parse_field(&item, "vICMS", self.icms_value.as_deref())?;
        let product_value = parse_field(&item, "vProd", self.product_value.as_deref())?;
        let icms_base = parse_field(&item, "vBC", self.icms_base.as_deref())?;
        let declared_presumed_credit =
            parse_field(&item, "vCredPresumido", self.declared_credit.as_deref())?;

        Ok(InvoiceLine {
            item_number: item,
            ncm_code: self.ncm.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            icms_rate_percent,
            icms_value,
            product_value,
            icms_base,
            benefit_code: self
                .benefit_code
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            declared_presumed_credit,
        })
    }
}

/// Parse an optional numeric field; absence means zero.
fn parse_field(item: &str, field: &str, raw: Option<&str>) -> Result<Decimal, ItemWarning> {
    let Some(raw) = raw else {
        return Ok(Decimal::ZERO);
    };
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|e| ItemWarning::with_field(item, field, format!("invalid decimal '{s}': {e}")))
}

/// `dhEmi` is an RFC 3339 timestamp, the older `dEmi` a plain date.
fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn doc(dets: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe42240512345678000190550010000012341000012345" versao="4.00">
      <ide><serie>1</serie><nNF>1234</nNF><dhEmi>2024-05-10T10:15:00-03:00</dhEmi></ide>
      <emit><CNPJ>12345678000190</CNPJ><xNome>Metalurgica Exemplo Ltda</xNome></emit>
      <dest><xNome>Cliente Exemplo SA</xNome></dest>
      {dets}
    </infNFe>
  </NFe>
</nfeProc>"#
        )
    }

    #[test]
    fn reads_header() {
        let x = extract_lines(doc("").as_bytes()).unwrap();
        assert_eq!(
            x.header.access_key.as_deref(),
            Some("42240512345678000190550010000012341000012345")
        );
        assert_eq!(x.header.number.as_deref(), Some("1234"));
        assert_eq!(x.header.series.as_deref(), Some("1"));
        assert_eq!(x.header.issue_date, NaiveDate::from_ymd_opt(2024, 5, 10));
        assert_eq!(x.header.issuer_cnpj.as_deref(), Some("12345678000190"));
        assert_eq!(x.header.issuer_name.as_deref(), Some("Metalurgica Exemplo Ltda"));
        assert_eq!(x.header.recipient_name.as_deref(), Some("Cliente Exemplo SA"));
        assert!(x.lines.is_empty());
    }

    #[test]
    fn reads_icms_fields_only_inside_icms_group() {
        let xml = doc(
            r#"<det nItem="1">
                 <prod><NCM>74055000</NCM><vProd>1000.00</vProd></prod>
                 <imposto>
                   <ICMS><ICMS00><vBC>1000.00</vBC><pICMS>4.00</pICMS><vICMS>40.00</vICMS></ICMS00></ICMS>
                   <IPI><IPITrib><vBC>999.00</vBC></IPITrib></IPI>
                 </imposto>
               </det>"#,
        );
        let x = extract_lines(xml.as_bytes()).unwrap();
        let l = &x.lines[0];
        assert_eq!(l.icms_base, dec!(1000));
        assert_eq!(l.icms_rate_percent, dec!(4));
        assert_eq!(l.icms_value, dec!(40));
        assert_eq!(l.benefit_code, NOT_AVAILABLE);
        assert_eq!(l.declared_presumed_credit, Decimal::ZERO);
    }

    #[test]
    fn item_number_attribute_is_unescaped_or_defaulted() {
        let xml = doc(r#"<det nItem="&#55;"/><det nItem=" "/>"#);
        let x = extract_lines(xml.as_bytes()).unwrap();
        assert_eq!(x.lines[0].item_number, "7");
        assert_eq!(x.lines[1].item_number, NOT_AVAILABLE);
    }

    #[test]
    fn empty_det_gets_defaults() {
        let x = extract_lines(doc(r#"<det nItem="7"/>"#).as_bytes()).unwrap();
        assert_eq!(x.lines.len(), 1);
        assert_eq!(x.lines[0].item_number, "7");
        assert_eq!(x.lines[0].ncm_code, NOT_AVAILABLE);
        assert_eq!(x.lines[0].product_value, Decimal::ZERO);
    }

    #[test]
    fn first_gcred_wins() {
        let xml = doc(
            r#"<det nItem="1"><prod>
                 <gCred><cCredPresumido>SC1</cCredPresumido><pCredPresumido>85</pCredPresumido><vCredPresumido>30.00</vCredPresumido></gCred>
                 <gCred><cCredPresumido>SC2</cCredPresumido><pCredPresumido>1</pCredPresumido><vCredPresumido>1.00</vCredPresumido></gCred>
               </prod></det>"#,
        );
        let x = extract_lines(xml.as_bytes()).unwrap();
        assert_eq!(x.lines[0].declared_presumed_credit, dec!(30));
    }

    #[test]
    fn parse_field_cases() {
        assert_eq!(parse_field("1", "vProd", None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_field("1", "vProd", Some(" 12.50 ")).unwrap(), dec!(12.5));
        assert_eq!(parse_field("1", "vProd", Some("1e3")).unwrap(), dec!(1000));
        let w = parse_field("4", "vICMS", Some("12,50")).unwrap_err();
        assert_eq!(w.item, "4");
        assert_eq!(w.field.as_deref(), Some("vICMS"));
    }

    #[test]
    fn issue_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 10);
        assert_eq!(parse_issue_date("2024-05-10T23:59:00-03:00"), d);
        assert_eq!(parse_issue_date("2024-05-10"), d);
        assert_eq!(parse_issue_date("10/05/2024"), None);
    }

    #[test]
    fn foreign_namespace_elements_are_ignored() {
        let xml = doc(
            r#"<det nItem="1" xmlns:x="urn:other"><prod><x:vProd>5.00</x:vProd><vProd>7.00</vProd></prod></det>"#,
        );
        let x = extract_lines(xml.as_bytes()).unwrap();
        assert_eq!(x.lines[0].product_value, dec!(7));
    }
}
