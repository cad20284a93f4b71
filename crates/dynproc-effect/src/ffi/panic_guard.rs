//! Panic guards for the C ABI.
//!
//! Unwinding across `extern "C"` is undefined behaviour, so every exported
//! function body runs inside one of these macros.

/// Wrap a body returning [`DpException`](super::types::DpException).
///
/// A panic becomes `DpException::TransactionFailed`.
macro_rules! ffi_guard {
    ($($body:tt)*) => {{
        use std::panic;
        use std::panic::AssertUnwindSafe;

        match panic::catch_unwind(AssertUnwindSafe(move || { $($body)* })) {
            Ok(result) => result,
            Err(_) => $crate::ffi::types::DpException::TransactionFailed,
        }
    }};
}

/// Wrap a body returning [`DpStatus`](super::types::DpStatus).
///
/// A panic becomes a status with `TransactionFailed` and nothing consumed.
macro_rules! ffi_guard_status {
    ($($body:tt)*) => {{
        use std::panic;
        use std::panic::AssertUnwindSafe;

        match panic::catch_unwind(AssertUnwindSafe(move || { $($body)* })) {
            Ok(result) => result,
            Err(_) => $crate::ffi::types::DpStatus::failed(
                $crate::ffi::types::DpException::TransactionFailed,
            ),
        }
    }};
}

pub(crate) use ffi_guard;
pub(crate) use ffi_guard_status;

#[cfg(test)]
mod tests {
    use crate::ffi::types::{DpException, DpStatus};

    #[test]
    fn ffi_guard_returns_value_on_success() {
        let result: DpException = ffi_guard! { DpException::None };
        assert_eq!(result, DpException::None);
    }

    #[test]
    fn ffi_guard_catches_panic() {
        let result: DpException = ffi_guard! {
            panic!("test panic");
        };
        assert_eq!(result, DpException::TransactionFailed);
    }

    #[test]
    fn ffi_guard_status_catches_panic() {
        let status: DpStatus = ffi_guard_status! {
            panic!("test panic");
        };
        assert_eq!(status.status, DpException::TransactionFailed as i32);
        assert_eq!(status.fmq_consumed, 0);
    }
}
