use thiserror::Error;

/// Errors that abort an audit run.
///
/// Problems confined to a single line item are not errors; they are reported
/// as [`ItemWarning`]s and the run continues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditError {
    /// The input is not a well-formed NF-e XML document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A context flag could not be interpreted.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// The result table could not be encoded.
    #[error("export error: {0}")]
    Export(String),
}

/// A line item that was excluded from the result table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemWarning {
    /// `nItem` of the offending line, or `N/A` when it could not be read.
    pub item: String,
    /// Source element that failed (e.g. "vICMS"), if known.
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ItemWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "item {}: {}: {}", self.item, field, self.message)
        } else {
            write!(f, "item {}: {}", self.item, self.message)
        }
    }
}

impl ItemWarning {
    /// Create a warning that is not tied to a specific field.
    pub fn new(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            field: None,
            message: message.into(),
        }
    }

    /// Create a warning for a specific source field.
    pub fn with_field(
        item: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_with_field() {
        let w = ItemWarning::with_field("3", "vICMS", "invalid decimal 'abc'");
        assert_eq!(w.to_string(), "item 3: vICMS: invalid decimal 'abc'");
    }

    #[test]
    fn warning_display_without_field() {
        let w = ItemWarning::new("N/A", "missing item number");
        assert_eq!(w.to_string(), "item N/A: missing item number");
    }
}
