//! Utility functions for string formatting and validation.

pub mod format;

pub use format::{canonical_phone, digits_only, staff_name, truncate, valid_email};
