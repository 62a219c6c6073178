//! Error types for best-fit fallback.
//!
//! Provides [`FallbackError`] for the conditions a caller can observe:
//! invalid surrogate halves, a table that could not be loaded, and
//! malformed table data. Recursive fallback is not an error value: it
//! means the mapping table is broken and panics at the call site.

use std::fmt;

/// Inclusive range of UTF-16 high surrogates.
pub const HIGH_SURROGATE_RANGE: (u16, u16) = (0xD800, 0xDBFF);

/// Inclusive range of UTF-16 low surrogates.
pub const LOW_SURROGATE_RANGE: (u16, u16) = (0xDC00, 0xDFFF);

/// Errors raised by best-fit tables, providers, and buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    /// A surrogate half passed to a pair fallback lies outside its range.
    SurrogateOutOfRange {
        /// Which half was wrong (`"high"` or `"low"`).
        argument: &'static str,
        /// The offending code unit.
        value: u16,
        /// Lowest accepted code unit.
        min: u16,
        /// Highest accepted code unit.
        max: u16,
    },
    /// The best-fit table for a code page could not be loaded.
    TableUnavailable {
        /// The code page that was requested.
        code_page: u16,
        /// Why the data source failed.
        reason: String,
    },
    /// Table data does not form valid (source, replacement) pairs.
    MalformedTable(String),
    /// I/O error reading table data.
    Io(String),
}

impl FallbackError {
    /// Build a [`FallbackError::TableUnavailable`] for `code_page`.
    pub fn unavailable(code_page: u16, reason: impl Into<String>) -> Self {
        FallbackError::TableUnavailable {
            code_page,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackError::SurrogateOutOfRange {
                argument,
                value,
                min,
                max,
            } => write!(
                f,
                "{argument} surrogate 0x{value:04X} out of range: expected 0x{min:04X}..=0x{max:04X}"
            ),
            FallbackError::TableUnavailable { code_page, reason } => {
                write!(f, "best-fit table for code page {code_page} unavailable: {reason}")
            }
            FallbackError::MalformedTable(msg) => write!(f, "malformed best-fit table: {msg}"),
            FallbackError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for FallbackError {}

impl From<std::io::Error> for FallbackError {
    fn from(err: std::io::Error) -> Self {
        FallbackError::Io(err.to_string())
    }
}

/// Check that `high` and `low` form a surrogate pair.
///
/// The high half is checked first, so when both are wrong the error
/// names the high half.
pub fn check_surrogate_pair(high: u16, low: u16) -> Result<(), FallbackError> {
    check_range("high", high, HIGH_SURROGATE_RANGE)?;
    check_range("low", low, LOW_SURROGATE_RANGE)
}

fn check_range(
    argument: &'static str,
    value: u16,
    (min, max): (u16, u16),
) -> Result<(), FallbackError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FallbackError::SurrogateOutOfRange {
            argument,
            value,
            min,
            max,
        })
    }
}
