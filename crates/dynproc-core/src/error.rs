//! Error types for the dynproc effect.
//!
//! Every error carries the exception code the host ABI reports back to its
//! caller, so the binding layer can turn any failure into a status value
//! without a lookup table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exception codes reported across the effect ABI.
///
/// Values match the host framework's binder exception codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExceptionCode {
    /// Success.
    #[default]
    None = 0,
    /// An argument was malformed, out of range, or not supported.
    IllegalArgument = -3,
    /// A required object (context, buffer, output slot) was missing.
    NullPointer = -4,
    /// The call is not valid in the current lifecycle state.
    IllegalState = -5,
    /// The operation is not supported by this implementation.
    UnsupportedOperation = -7,
}

impl ExceptionCode {
    /// Raw integer value as seen by C callers.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns true for [`ExceptionCode::None`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Errors that can occur in the effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// Argument rejected (bad UUID, bad tag, out-of-range value).
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Required object missing (no context, null output).
    #[error("null pointer: {0}")]
    NullPointer(String),

    /// Operation not allowed in the current state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Operation not supported (e.g. worker creation failed).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl EffectError {
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Self::IllegalArgument(msg.into())
    }

    pub fn null_pointer(msg: impl Into<String>) -> Self {
        Self::NullPointer(msg.into())
    }

    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Exception code for this error.
    pub fn exception_code(&self) -> ExceptionCode {
        match self {
            Self::IllegalArgument(_) => ExceptionCode::IllegalArgument,
            Self::NullPointer(_) => ExceptionCode::NullPointer,
            Self::IllegalState(_) => ExceptionCode::IllegalState,
            Self::UnsupportedOperation(_) => ExceptionCode::UnsupportedOperation,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::IllegalArgument(msg)
            | Self::NullPointer(msg)
            | Self::IllegalState(msg)
            | Self::UnsupportedOperation(msg) => msg,
        }
    }
}

/// Result type for effect operations.
pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_code_values() {
        assert_eq!(ExceptionCode::None.as_raw(), 0);
        assert_eq!(ExceptionCode::IllegalArgument.as_raw(), -3);
        assert_eq!(ExceptionCode::NullPointer.as_raw(), -4);
        assert_eq!(ExceptionCode::IllegalState.as_raw(), -5);
        assert_eq!(ExceptionCode::UnsupportedOperation.as_raw(), -7);
    }

    #[test]
    fn test_error_maps_to_code() {
        let err = EffectError::illegal_argument("uuid not supported");
        assert_eq!(err.exception_code(), ExceptionCode::IllegalArgument);
        assert_eq!(err.message(), "uuid not supported");
        assert_eq!(err.to_string(), "illegal argument: uuid not supported");

        let err = EffectError::null_pointer("nullContext");
        assert_eq!(err.exception_code(), ExceptionCode::NullPointer);
    }
}
