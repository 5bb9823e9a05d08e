// Trace fixture error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Trace error code constants
///
/// Error code range: 4001-4004
pub struct TraceErrorCodes {}

impl TraceErrorCodes {
    /// Fixture file does not exist in the catalog
    pub const NOT_FOUND: i32 = 4001;

    /// Fixture JSON could not be parsed
    pub const PARSE: i32 = 4002;

    /// Fixture has no samples
    pub const EMPTY: i32 = 4003;

    /// Fixture timestamps go backwards
    pub const NON_MONOTONIC: i32 = 4004;
}

/// Log a trace error with structured context
pub fn log_trace_error(err: &TraceError, context: &str) {
    error!(
        "Trace error in {}: code={}, component=FixtureCatalog, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while loading recorded pedal traces
///
/// Error code range: 4001-4004
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// No fixture with this name exists
    NotFound { fixture: String },

    /// Fixture JSON was malformed
    Parse { fixture: String, reason: String },

    /// Fixture contains no samples
    Empty { fixture: String },

    /// Sample timestamps decrease at the given index
    NonMonotonic { fixture: String, index: usize },
}

impl ErrorCode for TraceError {
    fn code(&self) -> i32 {
        match self {
            TraceError::NotFound { .. } => TraceErrorCodes::NOT_FOUND,
            TraceError::Parse { .. } => TraceErrorCodes::PARSE,
            TraceError::Empty { .. } => TraceErrorCodes::EMPTY,
            TraceError::NonMonotonic { .. } => TraceErrorCodes::NON_MONOTONIC,
        }
    }

    fn message(&self) -> String {
        match self {
            TraceError::NotFound { fixture } => format!("Fixture not found: {}", fixture),
            TraceError::Parse { fixture, reason } => {
                format!("Failed to parse fixture {}: {}", fixture, reason)
            }
            TraceError::Empty { fixture } => format!("Fixture {} has no samples", fixture),
            TraceError::NonMonotonic { fixture, index } => {
                format!(
                    "Fixture {} timestamps go backwards at sample {}",
                    fixture, index
                )
            }
        }
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TraceError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for TraceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_error_codes() {
        let fixture = "clean_fast".to_string();
        assert_eq!(
            TraceError::NotFound {
                fixture: fixture.clone()
            }
            .code(),
            4001
        );
        assert_eq!(
            TraceError::Parse {
                fixture: fixture.clone(),
                reason: "eof".to_string()
            }
            .code(),
            4002
        );
        assert_eq!(
            TraceError::Empty {
                fixture: fixture.clone()
            }
            .code(),
            4003
        );
        assert_eq!(TraceError::NonMonotonic { fixture, index: 3 }.code(), 4004);
    }

    #[test]
    fn test_trace_error_messages() {
        let err = TraceError::NonMonotonic {
            fixture: "jitter".to_string(),
            index: 7,
        };
        assert_eq!(
            err.message(),
            "Fixture jitter timestamps go backwards at sample 7"
        );
    }
}
