//! Core types shared across domslim facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RunId identifying a single simplification pass
//! - **Schema constants**: Canonical field keys, event names and phase names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
