//! Domain error types.

use chrono::NaiveDate;

/// A rejected ledger operation. The ledger is unchanged when one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field}: {value} (must be a non-negative amount)")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} overflows to {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("instrument '{instrument}' is reserved for the capital row")]
    ReservedInstrument { instrument: String },

    #[error("date {date} is outside the storable years 1-9999")]
    DateOutOfRange { date: NaiveDate },

    #[error("trade index {index} out of range (journal has {len} trades)")]
    OutOfRange { index: usize, len: usize },
}

/// A journal source that is not tabular journal text at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unreadable journal source: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error type for tradelog.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) => 1,
            JournalError::ConfigParse { .. } | JournalError::ConfigInvalid { .. } => 2,
            JournalError::Validation(_) | JournalError::InvalidInput { .. } => 3,
            JournalError::Parse(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_messages() {
        let err = ValidationError::InvalidAmount {
            field: "stake",
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid stake: -5 (must be a non-negative amount)"
        );

        let err = ValidationError::NonFinite {
            field: "profit",
            value: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "profit overflows to inf");

        let err = ValidationError::OutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "trade index 3 out of range (journal has 2 trades)"
        );
    }

    #[test]
    fn parse_error_converts_into_journal_error() {
        let err: JournalError = ParseError::new("empty source").into();
        assert!(matches!(err, JournalError::Parse(_)));
        assert_eq!(err.to_string(), "unreadable journal source: empty source");
    }
}
