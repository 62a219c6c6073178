//! Error types for best-fit data parsing.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`ParseError`]
//! and its conversion to [`FallbackError`] for table sources.

use bestfit_core::FallbackError;
use thiserror::Error;

/// Error type for reading best-fit code page data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line could not be understood.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Error reading the data file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data has no `CODEPAGE` header.
    #[error("missing CODEPAGE header")]
    MissingCodePage,

    /// A target byte sequence needs decoding but the code page has no decoder.
    #[error("no decoder for code page {0}")]
    UnsupportedCodePage(u16),

    /// The data describes a different code page than the one requested.
    #[error("expected code page {expected}, data declares {found}")]
    CodePageMismatch {
        /// The requested code page.
        expected: u16,
        /// The code page named in the `CODEPAGE` header.
        found: u16,
    },

    /// A table section is larger than the configured limit.
    #[error("{section} has {actual} entries, limit is {limit}")]
    LimitExceeded {
        /// Section keyword.
        section: &'static str,
        /// Configured limit.
        limit: usize,
        /// Declared or actual entry count.
        actual: usize,
    },

    /// A table section holds a different number of entries than declared.
    #[error("{section} declares {declared} entries but has {actual}")]
    CountMismatch {
        /// Section keyword.
        section: &'static str,
        /// Count from the section header.
        declared: usize,
        /// Entries actually read.
        actual: usize,
    },
}

impl From<ParseError> for FallbackError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => FallbackError::Io(e.to_string()),
            ParseError::UnsupportedCodePage(code_page) => {
                FallbackError::unavailable(code_page, "no decoder for code page")
            }
            ParseError::CodePageMismatch { expected, found } => FallbackError::unavailable(
                expected,
                format!("data declares code page {found}"),
            ),
            other => FallbackError::MalformedTable(other.to_string()),
        }
    }
}

pub(crate) fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display() {
        let err = syntax(12, "expected two values");
        assert_eq!(err.to_string(), "line 12: expected two values");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ParseError = io_err.into();
        assert!(matches!(err, ParseError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn io_to_fallback_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FallbackError = ParseError::Io(io_err).into();
        assert!(matches!(err, FallbackError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn unsupported_code_page_to_fallback_error() {
        let err: FallbackError = ParseError::UnsupportedCodePage(37).into();
        assert!(matches!(err, FallbackError::TableUnavailable { code_page: 37, .. }));
    }

    #[test]
    fn mismatch_to_fallback_error_names_requested_page() {
        let err: FallbackError = ParseError::CodePageMismatch {
            expected: 1252,
            found: 1250,
        }
        .into();
        assert_eq!(
            err,
            FallbackError::unavailable(1252, "data declares code page 1250")
        );
    }

    #[test]
    fn count_mismatch_to_malformed_table() {
        let err: FallbackError = ParseError::CountMismatch {
            section: "WCTABLE",
            declared: 3,
            actual: 2,
        }
        .into();
        assert_eq!(
            err,
            FallbackError::MalformedTable("WCTABLE declares 3 entries but has 2".to_string())
        );
    }

    #[test]
    fn limit_exceeded_display() {
        let err = ParseError::LimitExceeded {
            section: "MBTABLE",
            limit: 10,
            actual: 256,
        };
        assert_eq!(err.to_string(), "MBTABLE has 256 entries, limit is 10");
    }
}
