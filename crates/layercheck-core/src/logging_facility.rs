//! Structured logging for layercheck
//!
//! One `init(profile)` entry point, the `log_op_*` lifecycle macros used at
//! operation boundaries (`validate`, `extract`, `compare`) and an in-memory
//! capture layer for tests.
//!
//! ```rust
//! use layercheck_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
