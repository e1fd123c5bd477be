//! Error types for decoding vimball archives.

use thiserror::Error;

/// Errors raised while decoding an archive byte stream.
///
/// Any of these aborts decoding of the whole archive; no partial entry list
/// is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The first three lines are not the vimball signature.
    #[error("not a vimball: signature mismatch")]
    Format,

    /// A member header or line count is malformed.
    #[error("error when parsing vimball at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl DecodeError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        DecodeError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = DecodeError::parse(7, "missing line count");
        assert_eq!(
            err.to_string(),
            "error when parsing vimball at line 7: missing line count"
        );
    }

    #[test]
    fn test_format_error_display() {
        assert!(DecodeError::Format.to_string().starts_with("not a vimball"));
    }
}
