//! Parameter building errors

/// Errors raised while building or reading projection input
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// Digit-count range with `min > max`, or outside what fits in a `u64`
    #[error("invalid digit range: {min}..={max}")]
    InvalidDigitRange {
        /// Minimum digits
        min: u32,
        /// Maximum digits
        max: u32,
    },

    /// CSV content without a header and a data row
    #[error("malformed csv: {0}")]
    MalformedCsv(String),

    /// Parameters JSON could not be read or written
    #[error("parameters json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParamsError {
    /// Check if the error comes from caller input rather than program misuse
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MalformedCsv(_) | Self::Json(_))
    }
}
