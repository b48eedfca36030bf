//! Staff records, visibility flags, and the staff edit draft.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::{canonical_phone, digits_only, staff_name, valid_email};

/// A tri-state visibility flag.
///
/// Exported files use JSON `true` / `false` / `null`, so the wire format
/// stays a nullable boolean while the in-memory type makes "absent" an
/// explicit state instead of an Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Flag {
    On,
    Off,
    Unset,
}

impl From<Option<bool>> for Flag {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Flag::On,
            Some(false) => Flag::Off,
            None => Flag::Unset,
        }
    }
}

impl From<Flag> for Option<bool> {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::On => Some(true),
            Flag::Off => Some(false),
            Flag::Unset => None,
        }
    }
}

impl Flag {
    /// Cycle On -> Off -> Unset -> On, for the visibility dialog.
    pub fn cycled(self) -> Self {
        match self {
            Flag::On => Flag::Off,
            Flag::Off => Flag::Unset,
            Flag::Unset => Flag::On,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Flag::On => "yes",
            Flag::Off => "no",
            Flag::Unset => "unset",
        }
    }
}

/// The six visibility flags, addressable for single-flag edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityField {
    ShowUser,
    ShowTitle,
    ShowName,
    ShowEmail,
    ShowPhone,
    Active,
}

impl VisibilityField {
    pub const ALL: [VisibilityField; 6] = [
        VisibilityField::ShowUser,
        VisibilityField::ShowTitle,
        VisibilityField::ShowName,
        VisibilityField::ShowEmail,
        VisibilityField::ShowPhone,
        VisibilityField::Active,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisibilityField::ShowUser => "Show Staff User",
            VisibilityField::ShowTitle => "Show Title",
            VisibilityField::ShowName => "Show Name",
            VisibilityField::ShowEmail => "Show Email",
            VisibilityField::ShowPhone => "Show Phone Number",
            VisibilityField::Active => "Staff Active",
        }
    }
}

/// Derived visibility status, computed from the six flags on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityStatus {
    Visible,
    Hidden,
    Custom,
}

impl VisibilityStatus {
    pub fn label(self) -> &'static str {
        match self {
            VisibilityStatus::Visible => "visible",
            VisibilityStatus::Hidden => "hidden",
            VisibilityStatus::Custom => "custom",
        }
    }
}

/// One-click visibility presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPreset {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(rename = "staffId")]
    pub staff_id: Uuid,
    #[serde(rename = "staffTitle")]
    pub title: String,
    /// Derived from the three name parts on save, never edited directly.
    #[serde(rename = "staffName")]
    pub name: String,
    #[serde(rename = "staffFirstName")]
    pub first_name: String,
    #[serde(rename = "staffMiddleName")]
    pub middle_name: String,
    #[serde(rename = "staffLastName")]
    pub last_name: String,
    #[serde(rename = "staffEmail")]
    pub email: String,
    #[serde(rename = "staffPhoneNumber")]
    pub phone: String,
    #[serde(rename = "canShowStaffUser")]
    pub can_show_user: Flag,
    #[serde(rename = "canShowTitle")]
    pub can_show_title: Flag,
    #[serde(rename = "canShowName")]
    pub can_show_name: Flag,
    #[serde(rename = "canShowEmail")]
    pub can_show_email: Flag,
    #[serde(rename = "canShowPhoneNumber")]
    pub can_show_phone: Flag,
    #[serde(rename = "staffLinkOrDirectoryLink")]
    pub profile_link: Option<String>,
    #[serde(rename = "staffActive")]
    pub active: Flag,
}

impl Staff {
    /// A blank record with every flag on, the default for newly added rows.
    pub fn new() -> Self {
        Self {
            staff_id: Uuid::new_v4(),
            title: String::new(),
            name: String::new(),
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            can_show_user: Flag::On,
            can_show_title: Flag::On,
            can_show_name: Flag::On,
            can_show_email: Flag::On,
            can_show_phone: Flag::On,
            profile_link: None,
            active: Flag::On,
        }
    }

    pub fn flag(&self, field: VisibilityField) -> Flag {
        match field {
            VisibilityField::ShowUser => self.can_show_user,
            VisibilityField::ShowTitle => self.can_show_title,
            VisibilityField::ShowName => self.can_show_name,
            VisibilityField::ShowEmail => self.can_show_email,
            VisibilityField::ShowPhone => self.can_show_phone,
            VisibilityField::Active => self.active,
        }
    }

    pub fn set_flag(&mut self, field: VisibilityField, value: Flag) {
        match field {
            VisibilityField::ShowUser => self.can_show_user = value,
            VisibilityField::ShowTitle => self.can_show_title = value,
            VisibilityField::ShowName => self.can_show_name = value,
            VisibilityField::ShowEmail => self.can_show_email = value,
            VisibilityField::ShowPhone => self.can_show_phone = value,
            VisibilityField::Active => self.active = value,
        }
    }

    pub fn apply_preset(&mut self, preset: VisibilityPreset) {
        match preset {
            VisibilityPreset::Visible => {
                for field in VisibilityField::ALL {
                    self.set_flag(field, Flag::On);
                }
            }
            VisibilityPreset::Hidden => {
                // The hidden preset leaves staffActive unset rather than off.
                // Existing exported files depend on the null, so the
                // asymmetry with the status check below is kept.
                self.can_show_user = Flag::Off;
                self.can_show_title = Flag::Off;
                self.can_show_name = Flag::Off;
                self.can_show_email = Flag::Off;
                self.can_show_phone = Flag::Off;
                self.active = Flag::Unset;
            }
        }
    }

    /// Visible iff all six flags are on; hidden iff the five display flags
    /// are off (staffActive unconstrained); everything else is custom.
    pub fn visibility_status(&self) -> VisibilityStatus {
        let display = [
            self.can_show_user,
            self.can_show_title,
            self.can_show_name,
            self.can_show_email,
            self.can_show_phone,
        ];
        if display.iter().all(|&f| f == Flag::On) && self.active == Flag::On {
            VisibilityStatus::Visible
        } else if display.iter().all(|&f| f == Flag::Off) {
            VisibilityStatus::Hidden
        } else {
            VisibilityStatus::Custom
        }
    }

    /// All five display flags off, regardless of staffActive.
    /// The warning report counts these as fully hidden.
    pub fn fully_hidden(&self) -> bool {
        [
            self.can_show_user,
            self.can_show_title,
            self.can_show_name,
            self.can_show_email,
            self.can_show_phone,
        ]
        .iter()
        .all(|&f| f == Flag::Off)
    }
}

impl Default for Staff {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable text fields on the staff edit row, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffField {
    Title,
    First,
    Middle,
    Last,
    Email,
    Phone,
}

impl StaffField {
    pub const ALL: [StaffField; 6] = [
        StaffField::Title,
        StaffField::First,
        StaffField::Middle,
        StaffField::Last,
        StaffField::Email,
        StaffField::Phone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StaffField::Title => "Title",
            StaffField::First => "First Name",
            StaffField::Middle => "Middle Name",
            StaffField::Last => "Last Name",
            StaffField::Email => "Email",
            StaffField::Phone => "Phone",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Field-level validation errors from a save attempt.
/// Both checks run independently so both can be shown at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftErrors {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// A buffered copy of a staff record being edited.
///
/// Edits accumulate here and are only committed to the store on a
/// successful save; cancel throws the draft away.
#[derive(Debug, Clone)]
pub struct StaffDraft {
    pub staff: Staff,
    pub errors: DraftErrors,
}

impl StaffDraft {
    pub fn new(staff: &Staff) -> Self {
        Self {
            staff: staff.clone(),
            errors: DraftErrors::default(),
        }
    }

    pub fn field(&self, field: StaffField) -> &str {
        match field {
            StaffField::Title => &self.staff.title,
            StaffField::First => &self.staff.first_name,
            StaffField::Middle => &self.staff.middle_name,
            StaffField::Last => &self.staff.last_name,
            StaffField::Email => &self.staff.email,
            StaffField::Phone => &self.staff.phone,
        }
    }

    /// Replace one field's text. Phone is reformatted on every keystroke;
    /// name edits recompute the derived full name. Typing into a field
    /// clears its pending validation error.
    pub fn set_field(&mut self, field: StaffField, value: String) {
        match field {
            StaffField::Title => self.staff.title = value,
            StaffField::First => self.staff.first_name = value,
            StaffField::Middle => self.staff.middle_name = value,
            StaffField::Last => self.staff.last_name = value,
            StaffField::Email => {
                self.staff.email = value;
                self.errors.email = None;
            }
            StaffField::Phone => {
                self.staff.phone = canonical_phone(&value);
                self.errors.phone = None;
            }
        }
        if matches!(field, StaffField::First | StaffField::Middle | StaffField::Last) {
            self.staff.name = staff_name(
                &self.staff.first_name,
                &self.staff.middle_name,
                &self.staff.last_name,
            );
        }
    }

    /// Validate the draft, recording any errors. Returns true when clean.
    pub fn validate(&mut self) -> bool {
        let mut errors = DraftErrors::default();
        if !valid_email(&self.staff.email) {
            errors.email = Some("Invalid email format".to_string());
        }
        if !self.staff.phone.is_empty() && digits_only(&self.staff.phone).len() != 10 {
            errors.phone = Some("Phone number must be 10 digits".to_string());
        }
        let ok = errors.is_empty();
        self.errors = errors;
        ok
    }

    /// Produce the record to commit: derived name recomputed, phone in
    /// canonical form. Call only after `validate` succeeds.
    pub fn committed(&self) -> Staff {
        let mut staff = self.staff.clone();
        staff.name = staff_name(&staff.first_name, &staff.middle_name, &staff.last_name);
        staff.phone = canonical_phone(&staff.phone);
        staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(staff: &mut Staff, display: Flag, active: Flag) {
        staff.can_show_user = display;
        staff.can_show_title = display;
        staff.can_show_name = display;
        staff.can_show_email = display;
        staff.can_show_phone = display;
        staff.active = active;
    }

    #[test]
    fn status_visible_requires_all_six_on() {
        let mut staff = Staff::new();
        assert_eq!(staff.visibility_status(), VisibilityStatus::Visible);

        staff.active = Flag::Off;
        assert_eq!(staff.visibility_status(), VisibilityStatus::Custom);

        staff.active = Flag::Unset;
        assert_eq!(staff.visibility_status(), VisibilityStatus::Custom);
    }

    #[test]
    fn status_hidden_ignores_active() {
        let mut staff = Staff::new();
        for active in [Flag::On, Flag::Off, Flag::Unset] {
            flags(&mut staff, Flag::Off, active);
            assert_eq!(staff.visibility_status(), VisibilityStatus::Hidden);
        }
    }

    #[test]
    fn status_mixed_is_custom() {
        let mut staff = Staff::new();
        staff.can_show_email = Flag::Off;
        assert_eq!(staff.visibility_status(), VisibilityStatus::Custom);

        flags(&mut staff, Flag::Unset, Flag::Unset);
        assert_eq!(staff.visibility_status(), VisibilityStatus::Custom);
    }

    #[test]
    fn presets_round_trip_to_their_status() {
        let mut staff = Staff::new();
        staff.apply_preset(VisibilityPreset::Hidden);
        assert_eq!(staff.visibility_status(), VisibilityStatus::Hidden);
        assert_eq!(staff.active, Flag::Unset);

        staff.apply_preset(VisibilityPreset::Visible);
        assert_eq!(staff.visibility_status(), VisibilityStatus::Visible);
    }

    #[test]
    fn flag_serde_uses_nullable_booleans() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrap {
            f: Flag,
        }
        let on: Wrap = serde_json::from_str(r#"{"f":true}"#).unwrap();
        let off: Wrap = serde_json::from_str(r#"{"f":false}"#).unwrap();
        let unset: Wrap = serde_json::from_str(r#"{"f":null}"#).unwrap();
        assert_eq!(on.f, Flag::On);
        assert_eq!(off.f, Flag::Off);
        assert_eq!(unset.f, Flag::Unset);

        assert_eq!(serde_json::to_string(&Wrap { f: Flag::Unset }).unwrap(), r#"{"f":null}"#);
        assert_eq!(serde_json::to_string(&Wrap { f: Flag::On }).unwrap(), r#"{"f":true}"#);
    }

    #[test]
    fn draft_save_rejects_bad_email_and_keeps_draft() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        draft.set_field(StaffField::Email, "bad-email".to_string());
        assert!(!draft.validate());
        assert!(draft.errors.email.is_some());
        assert_eq!(draft.staff.email, "bad-email");
    }

    #[test]
    fn draft_save_accepts_empty_email() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        assert!(draft.validate());
    }

    #[test]
    fn draft_reports_both_errors_at_once() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        draft.set_field(StaffField::Email, "nope".to_string());
        draft.set_field(StaffField::Phone, "123".to_string());
        assert!(!draft.validate());
        assert!(draft.errors.email.is_some());
        assert!(draft.errors.phone.is_some());
    }

    #[test]
    fn draft_canonicalizes_phone_on_commit() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        draft.set_field(StaffField::Phone, "5551234567".to_string());
        assert!(draft.validate());
        assert_eq!(draft.committed().phone, "555-123-4567");
    }

    #[test]
    fn draft_derives_name_from_parts() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        draft.set_field(StaffField::First, "John".to_string());
        draft.set_field(StaffField::Last, "Smith".to_string());
        assert_eq!(draft.staff.name, "John Smith");
        assert_eq!(draft.committed().name, "John Smith");
    }

    #[test]
    fn typing_clears_field_error() {
        let staff = Staff::new();
        let mut draft = StaffDraft::new(&staff);
        draft.set_field(StaffField::Email, "nope".to_string());
        draft.validate();
        assert!(draft.errors.email.is_some());
        draft.set_field(StaffField::Email, "coach@college.edu".to_string());
        assert!(draft.errors.email.is_none());
    }
}
