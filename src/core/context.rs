//! Caller-supplied flags that are not part of the invoice document.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::AuditError;

/// A discrete yes/no answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl FromStr for YesNo {
    type Err = AuditError;

    /// Accepts the Portuguese form labels ("SIM", "NÃO") as well as
    /// "yes"/"no" and "true"/"false", case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sim" | "s" | "yes" | "y" | "true" => Ok(YesNo::Yes),
            "não" | "nao" | "n" | "no" | "false" => Ok(YesNo::No),
            other => Err(AuditError::InvalidContext(format!(
                "expected SIM or NÃO, got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YesNo::Yes => f.write_str("SIM"),
            YesNo::No => f.write_str("NÃO"),
        }
    }
}

/// Context flags that drive the percentage selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    /// Recipient is opted into Simples Nacional (selects 70% instead of 82.5%
    /// at 12% ICMS).
    pub simples_nacional_client: YesNo,
    /// Industry / "carta de venda" operation with 10% ICMS (selects 90%
    /// instead of 64% at 10% ICMS).
    pub industry_ten_percent_icms: YesNo,
}

impl AuditContext {
    pub fn new(simples_nacional_client: YesNo, industry_ten_percent_icms: YesNo) -> Self {
        Self {
            simples_nacional_client,
            industry_ten_percent_icms,
        }
    }
}
