//! NF-e (Nota Fiscal Eletrônica) line extraction.
//!
//! Reads the `det` elements of an NF-e 4.00 document (`NFe`, `nfeProc` or
//! `enviNFe` root) and runs the TTD recalculation over them.
//!
//! # Example
//!
//! ```rust
//! use credito_presumido::core::*;
//! use credito_presumido::nfe;
//!
//! let xml = br#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe"><infNFe>
//!   <det nItem="1">
//!     <prod><NCM>74055000</NCM><vProd>1000.00</vProd>
//!       <gCred><vCredPresumido>30.00</vCredPresumido></gCred></prod>
//!     <imposto><ICMS><ICMS00>
//!       <vBC>1000.00</vBC><pICMS>4.00</pICMS><vICMS>40.00</vICMS>
//!     </ICMS00></ICMS></imposto>
//!   </det>
//! </infNFe></NFe>"#;
//!
//! let report = nfe::audit_nfe(xml, &AuditContext::default()).unwrap();
//! assert_eq!(report.lines.len(), 1);
//! assert!(report.warnings.is_empty());
//! ```

mod extract;

pub use extract::{Extraction, extract_lines};

use crate::core::{AuditContext, AuditError, AuditReport};
use crate::ttd::recalculate_all;

/// NF-e XML namespace.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// Extract every line of `xml` and recalculate its presumed credit.
///
/// Lines that cannot be read are listed in [`AuditReport::warnings`] and
/// left out of [`AuditReport::lines`].
pub fn audit_nfe(xml: &[u8], ctx: &AuditContext) -> Result<AuditReport, AuditError> {
    let Extraction {
        header,
        lines,
        warnings,
    } = extract_lines(xml)?;

    let lines = recalculate_all(&lines, ctx);
    tracing::debug!(
        number = header.number.as_deref().unwrap_or("?"),
        lines = lines.len(),
        skipped = warnings.len(),
        "NF-e audited"
    );

    Ok(AuditReport {
        header,
        lines,
        warnings,
    })
}
