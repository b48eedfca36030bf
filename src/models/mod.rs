//! Data models for the roster document.
//!
//! - `College`, `Sport`: the containment hierarchy with NCAA metadata
//! - `Staff`, `StaffDraft`: contact records and the buffered edit draft
//! - `Flag`, `VisibilityStatus`, `VisibilityPreset`: the tri-state
//!   visibility model and its derived status

pub mod college;
pub mod staff;

pub use college::{College, CollegeField, Sport, SportField};
pub use staff::{
    DraftErrors, Flag, Staff, StaffDraft, StaffField, VisibilityField, VisibilityPreset,
    VisibilityStatus,
};
