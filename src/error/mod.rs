// Error types for the pedal trainer core
//
// This module defines custom error types for configuration validation and
// trace loading, providing structured error handling with numeric error codes
// that a host UI can map to its own messages.

mod config;
mod trace;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use trace::{log_trace_error, TraceError, TraceErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
