//! Common utility functions shared across the domain and engine crates.
//!
//! Pure functions only: no side effects, no I/O.

pub mod datetime;
pub mod text;

pub use datetime::parse_datetime;
pub use text::{non_blank, StringExt};
