//! Structured logging for domslim
//!
//! - [`init`] installs the process subscriber for a [`Profile`]
//! - `log_op_start!`, `log_op_end!`, `log_op_error!` and `log_rule_match!`
//!   emit events with the canonical fields from
//!   [`domslim_core_types::schema`]
//! - [`test_capture`] records events in memory, grouped by pass `run_id`
//!
//! ```rust
//! use domslim_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
