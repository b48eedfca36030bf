//! The in-memory roster store.
//!
//! Holds the ordered list of colleges and the "current college" pointer.
//! The pointer is a college id resolved by lookup rather than a raw index,
//! so it cannot silently drift if the list is ever reordered. Colleges are
//! never deleted in-session, which keeps the pointer valid by construction.

use tracing::debug;
use uuid::Uuid;

use crate::models::{
    College, CollegeField, Flag, Sport, SportField, Staff, VisibilityField, VisibilityPreset,
    VisibilityStatus,
};

/// Direction for college navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// Data-quality warnings for one college, recomputed on demand.
///
/// Five independent scans over the college's sports; each list holds the
/// names of offending sports. Advisory only - navigation can always
/// proceed past a non-empty report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningReport {
    /// Sports with zero staff.
    pub no_coaches: Vec<String>,
    /// Sports where no staff member has a non-empty email.
    pub no_emails: Vec<String>,
    /// Sports with at least one staff member in custom visibility.
    pub custom_visibility: Vec<String>,
    /// Sports with at least one staff member whose five display flags are
    /// all off, regardless of the active flag.
    pub hidden_coaches: Vec<String>,
    /// Sports with at least one staff member explicitly marked inactive.
    pub inactive_coaches: Vec<String>,
}

impl WarningReport {
    pub fn is_empty(&self) -> bool {
        self.no_coaches.is_empty()
            && self.no_emails.is_empty()
            && self.custom_visibility.is_empty()
            && self.hidden_coaches.is_empty()
            && self.inactive_coaches.is_empty()
    }

    /// Scan one college's sports for data-entry omissions.
    pub fn for_college(college: &College) -> Self {
        let mut report = WarningReport::default();

        for sport in &college.sports {
            let name = sport.display_name().to_string();

            // An empty sport only gets the no-coaches warning
            if sport.staff.is_empty() {
                report.no_coaches.push(name);
                continue;
            }

            if !sport.staff.iter().any(|s| !s.email.trim().is_empty()) {
                report.no_emails.push(name.clone());
            }

            let mut has_custom = false;
            let mut has_hidden = false;
            let mut has_inactive = false;
            for staff in &sport.staff {
                if staff.active == Flag::Off {
                    has_inactive = true;
                }
                if staff.fully_hidden() {
                    has_hidden = true;
                } else if staff.visibility_status() == VisibilityStatus::Custom {
                    has_custom = true;
                }
            }
            if has_custom {
                report.custom_visibility.push(name.clone());
            }
            if has_hidden {
                report.hidden_coaches.push(name.clone());
            }
            if has_inactive {
                report.inactive_coaches.push(name);
            }
        }

        report
    }
}

/// The roster document plus the current-college pointer.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    colleges: Vec<College>,
    current_id: Option<Uuid>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole roster (file import). The pointer moves to the
    /// first college, or clears if the list is empty.
    pub fn replace(&mut self, colleges: Vec<College>) {
        self.current_id = colleges.first().map(|c| c.college_id);
        self.colleges = colleges;
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colleges.len()
    }

    /// Position of the current college, resolved from its id.
    pub fn current_index(&self) -> Option<usize> {
        let id = self.current_id?;
        self.colleges.iter().position(|c| c.college_id == id)
    }

    pub fn current(&self) -> Option<&College> {
        self.current_index().map(|i| &self.colleges[i])
    }

    fn current_mut(&mut self) -> Option<&mut College> {
        let idx = self.current_index()?;
        Some(&mut self.colleges[idx])
    }

    // =========================================================================
    // College operations
    // =========================================================================

    /// Append a default college and move the pointer to it.
    pub fn add_college(&mut self) -> &College {
        let college = College::new();
        debug!(id = %college.college_id, "Adding college");
        self.current_id = Some(college.college_id);
        self.colleges.push(college);
        self.colleges.last().expect("just pushed")
    }

    pub fn update_college_field(&mut self, field: CollegeField, value: String) {
        let Some(college) = self.current_mut() else {
            return;
        };
        match field {
            CollegeField::Name => {
                college.official_name_lowercase = value.to_lowercase();
                college.official_name = value;
            }
            CollegeField::State => college.state_province = value,
            CollegeField::Division => college.division_ncaa = value,
            CollegeField::CollegeWebsite => college.college_website_url = value,
            CollegeField::AthleticWebsite => college.athletic_website_url = value,
        }
        college.touch();
    }

    pub fn college_field(&self, field: CollegeField) -> &str {
        let Some(college) = self.current() else {
            return "";
        };
        match field {
            CollegeField::Name => &college.official_name,
            CollegeField::State => &college.state_province,
            CollegeField::Division => &college.division_ncaa,
            CollegeField::CollegeWebsite => &college.college_website_url,
            CollegeField::AthleticWebsite => &college.athletic_website_url,
        }
    }

    // =========================================================================
    // Sport operations
    // =========================================================================

    /// Append a default sport to the current college; returns its position.
    pub fn add_sport(&mut self) -> Option<usize> {
        let college = self.current_mut()?;
        college.sports.push(Sport::new());
        college.touch();
        Some(college.sports.len() - 1)
    }

    pub fn sport(&self, sport_idx: usize) -> Option<&Sport> {
        self.current()?.sports.get(sport_idx)
    }

    pub fn update_sport_field(&mut self, sport_idx: usize, field: SportField, value: String) {
        let Some(college) = self.current_mut() else {
            return;
        };
        let Some(sport) = college.sports.get_mut(sport_idx) else {
            return;
        };
        match field {
            SportField::Name => sport.name = value,
            SportField::Division => sport.division = value,
            SportField::Conference => sport.conference = value,
            SportField::CoachDirectoryLink => sport.coach_directory_link = value,
        }
        college.touch();
    }

    /// Remove a sport and all its staff. Callers confirm with the user first.
    pub fn delete_sport(&mut self, sport_idx: usize) {
        let Some(college) = self.current_mut() else {
            return;
        };
        if sport_idx < college.sports.len() {
            let removed = college.sports.remove(sport_idx);
            debug!(sport = %removed.display_name(), "Deleted sport");
            college.touch();
        }
    }

    // =========================================================================
    // Staff operations
    // =========================================================================

    /// Append a blank staff record (all flags on) to a sport; returns its
    /// position so the caller can enter edit mode immediately.
    pub fn add_staff(&mut self, sport_idx: usize) -> Option<usize> {
        let college = self.current_mut()?;
        let sport = college.sports.get_mut(sport_idx)?;
        sport.staff.push(Staff::new());
        let idx = sport.staff.len() - 1;
        college.touch();
        Some(idx)
    }

    pub fn staff(&self, sport_idx: usize, staff_idx: usize) -> Option<&Staff> {
        self.sport(sport_idx)?.staff.get(staff_idx)
    }

    /// Commit a validated, canonicalized record over the stored one.
    pub fn commit_staff(&mut self, sport_idx: usize, staff_idx: usize, staff: Staff) {
        let Some(college) = self.current_mut() else {
            return;
        };
        let Some(slot) = college
            .sports
            .get_mut(sport_idx)
            .and_then(|s| s.staff.get_mut(staff_idx))
        else {
            return;
        };
        *slot = staff;
        college.touch();
    }

    /// Remove a staff record. Callers confirm with the user first.
    pub fn delete_staff(&mut self, sport_idx: usize, staff_idx: usize) {
        let Some(college) = self.current_mut() else {
            return;
        };
        if let Some(sport) = college.sports.get_mut(sport_idx) {
            if staff_idx < sport.staff.len() {
                sport.staff.remove(staff_idx);
                college.touch();
            }
        }
    }

    pub fn set_visibility_preset(
        &mut self,
        sport_idx: usize,
        staff_idx: usize,
        preset: VisibilityPreset,
    ) {
        let Some(college) = self.current_mut() else {
            return;
        };
        if let Some(staff) = college
            .sports
            .get_mut(sport_idx)
            .and_then(|s| s.staff.get_mut(staff_idx))
        {
            staff.apply_preset(preset);
            college.touch();
        }
    }

    pub fn set_visibility_flag(
        &mut self,
        sport_idx: usize,
        staff_idx: usize,
        field: VisibilityField,
        value: Flag,
    ) {
        let Some(college) = self.current_mut() else {
            return;
        };
        if let Some(staff) = college
            .sports
            .get_mut(sport_idx)
            .and_then(|s| s.staff.get_mut(staff_idx))
        {
            staff.set_flag(field, value);
            college.touch();
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn can_navigate(&self, direction: NavDirection) -> bool {
        match (self.current_index(), direction) {
            (Some(idx), NavDirection::Previous) => idx > 0,
            (Some(idx), NavDirection::Next) => idx + 1 < self.colleges.len(),
            (None, _) => false,
        }
    }

    /// Move the pointer one college over. A no-op at the ends of the list.
    /// Returns true if the pointer moved.
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        let Some(idx) = self.current_index() else {
            return false;
        };
        let target = match direction {
            NavDirection::Previous => idx.checked_sub(1),
            NavDirection::Next => {
                if idx + 1 < self.colleges.len() {
                    Some(idx + 1)
                } else {
                    None
                }
            }
        };
        match target {
            Some(t) => {
                self.current_id = Some(self.colleges[t].college_id);
                true
            }
            None => false,
        }
    }

    /// The advisory report the navigation guard shows before moving away.
    pub fn current_warnings(&self) -> Option<WarningReport> {
        let report = WarningReport::for_college(self.current()?);
        if report.is_empty() {
            None
        } else {
            Some(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flag;

    fn store_with_college() -> RosterStore {
        let mut store = RosterStore::new();
        store.add_college();
        store
    }

    #[test]
    fn add_college_moves_pointer() {
        let mut store = RosterStore::new();
        assert!(store.current().is_none());
        store.add_college();
        assert_eq!(store.current_index(), Some(0));
        store.add_college();
        assert_eq!(store.current_index(), Some(1));
    }

    #[test]
    fn name_edit_recomputes_lowercase() {
        let mut store = store_with_college();
        store.update_college_field(CollegeField::Name, "Springfield State".to_string());
        let college = store.current().unwrap();
        assert_eq!(college.official_name, "Springfield State");
        assert_eq!(college.official_name_lowercase, "springfield state");
    }

    #[test]
    fn empty_sport_warns_no_coaches() {
        let mut store = store_with_college();
        store.add_sport().unwrap();
        store.update_sport_field(0, SportField::Name, "Rowing".to_string());

        let report = store.current_warnings().expect("report expected");
        assert_eq!(report.no_coaches, vec!["Rowing"]);
        // Empty sports are skipped by the remaining scans
        assert!(report.no_emails.is_empty());
    }

    #[test]
    fn staffed_sport_without_email_warns() {
        let mut store = store_with_college();
        store.add_sport().unwrap();
        store.add_staff(0).unwrap();

        let report = store.current_warnings().expect("report expected");
        assert!(report.no_coaches.is_empty());
        assert_eq!(report.no_emails, vec!["New Sport"]);
    }

    #[test]
    fn clean_college_has_no_report() {
        let mut store = store_with_college();
        store.add_sport().unwrap();
        let staff_idx = store.add_staff(0).unwrap();
        let mut staff = store.staff(0, staff_idx).unwrap().clone();
        staff.email = "coach@college.edu".to_string();
        store.commit_staff(0, staff_idx, staff);

        assert!(store.current_warnings().is_none());
    }

    #[test]
    fn hidden_and_inactive_and_custom_scans() {
        let mut store = store_with_college();
        store.add_sport().unwrap();
        for _ in 0..3 {
            store.add_staff(0).unwrap();
        }
        let mut with_email = store.staff(0, 0).unwrap().clone();
        with_email.email = "coach@college.edu".to_string();
        store.commit_staff(0, 0, with_email);

        // Staff 0: hidden preset; staff 1: explicitly inactive (custom);
        // staff 2: fully visible
        store.set_visibility_preset(0, 0, VisibilityPreset::Hidden);
        store.set_visibility_flag(0, 1, VisibilityField::Active, Flag::Off);

        let report = store.current_warnings().expect("report expected");
        assert_eq!(report.hidden_coaches, vec!["New Sport"]);
        assert_eq!(report.inactive_coaches, vec!["New Sport"]);
        assert_eq!(report.custom_visibility, vec!["New Sport"]);
        assert!(report.no_coaches.is_empty());
    }

    #[test]
    fn navigation_noop_at_ends() {
        let mut store = store_with_college();
        assert!(!store.navigate(NavDirection::Next));
        assert!(!store.navigate(NavDirection::Previous));
        assert_eq!(store.current_index(), Some(0));
    }

    #[test]
    fn navigation_moves_between_colleges() {
        let mut store = store_with_college();
        store.add_college();
        assert_eq!(store.current_index(), Some(1));
        assert!(store.navigate(NavDirection::Previous));
        assert_eq!(store.current_index(), Some(0));
        assert!(store.navigate(NavDirection::Next));
        assert_eq!(store.current_index(), Some(1));
    }

    #[test]
    fn second_college_back_navigation_sees_first_college_warnings() {
        // Import-like scenario: first college has one empty sport
        let mut store = store_with_college();
        store.add_sport().unwrap();

        // Only one college: next is a no-op
        assert!(!store.can_navigate(NavDirection::Next));

        store.add_college();
        assert!(store.current_warnings().is_none());
        store.navigate(NavDirection::Previous);
        let report = store.current_warnings().expect("report expected");
        assert_eq!(report.no_coaches, vec!["New Sport"]);
    }

    #[test]
    fn replace_points_at_first_college() {
        let mut store = store_with_college();
        store.add_college();
        let imported = vec![College::new(), College::new(), College::new()];
        let first_id = imported[0].college_id;
        store.replace(imported);
        assert_eq!(store.current().unwrap().college_id, first_id);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_staff_after_preset_keeps_order() {
        let mut store = store_with_college();
        store.add_sport().unwrap();
        store.add_staff(0).unwrap();
        store.add_staff(0).unwrap();
        let second_id = store.staff(0, 1).unwrap().staff_id;
        store.delete_staff(0, 0);
        assert_eq!(store.staff(0, 0).unwrap().staff_id, second_id);
        assert_eq!(store.sport(0).unwrap().staff.len(), 1);
    }
}
