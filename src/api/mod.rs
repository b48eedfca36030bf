//! Text-extraction bridge to the generative-text API.
//!
//! The only network surface in the application. One outbound POST per
//! extraction request, key passed as a URL query parameter, response
//! parsed locally into staff fields.

pub mod client;
pub mod error;

pub use client::{ExtractClient, ExtractedStaff, Extraction, DEFAULT_MODEL};
pub use error::ExtractError;
