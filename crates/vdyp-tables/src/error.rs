//! Error types for table lookups

/// Lookup failures when parsing codes or labels
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A code or label that is not part of the named vocabulary
    #[error("unknown {kind} code: '{code}'")]
    UnknownCode {
        /// Vocabulary being parsed (e.g. "derived-by")
        kind: &'static str,
        /// Offending input
        code: String,
    },

    /// A minimum-DBH label without a leading numeric threshold
    #[error("invalid utilization label: '{0}'")]
    InvalidUtilizationLabel(String),
}

impl TableError {
    /// Create unknown-code error
    #[inline]
    pub fn unknown(kind: &'static str, code: impl Into<String>) -> Self {
        Self::UnknownCode {
            kind,
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_display() {
        let err = TableError::unknown("bec-zone", "XYZ");
        assert_eq!(err.to_string(), "unknown bec-zone code: 'XYZ'");
    }
}
