//! C ABI for hosts that load the effect as a shared library.
//!
//! The entry points the host's effect loader resolves by name are
//! `createEffect`, `queryEffect` and `destroyEffect`. Everything else an
//! instance offers is exposed as `dynproc_*` functions on the opaque
//! [`DpEffect`](types::DpEffect) handle.
//!
//! # Symbol prefix
//!
//! - Functions: `dynproc_*` (plus the three loader entry points)
//! - Types: `Dp*`
//!
//! # Parameters
//!
//! Parameters and parameter ids cross the boundary as JSON text in the
//! serde representation of [`Parameter`](dynproc_core::Parameter) and
//! [`ParameterId`](dynproc_core::ParameterId).
//!
//! # Thread safety
//!
//! A handle may be used from several threads; the instance serializes
//! calls internally. `destroyEffect` must not race with any other call on
//! the same handle.

pub mod types;

mod conversions;
pub mod functions;
mod panic_guard;
