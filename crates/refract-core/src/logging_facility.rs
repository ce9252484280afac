//! Structured events emitted by the traversal engines
//!
//! The library never installs a subscriber on its own. Applications call
//! [`init`] once; tests call [`init_test_capture`] and assert on what was
//! recorded.
//!
//! What gets emitted:
//! - every reflective entry point logs `start`, then `end` or `end_error`,
//!   at debug level, tagged with `op` and the emitting module as `component`
//! - the field selector logs each skipped field as an `exclude` decision,
//!   and the cycle guard logs each cut-short re-entry as `reenter`, both at
//!   trace level with the affected `type_name`
//!
//! ```rust
//! use refract_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
