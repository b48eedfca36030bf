//! Application state management.
//!
//! The `App` struct owns the roster store, the UI mode state machine, the
//! buffered staff edit draft, the navigation guard, and the channel that
//! carries extraction results back from spawned tasks.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ExtractClient, Extraction};
use crate::config::Config;
use crate::files;
use crate::models::{
    CollegeField, Flag, SportField, StaffDraft, StaffField, VisibilityField, VisibilityPreset,
};
use crate::roster::{NavDirection, RosterStore, WarningReport};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the extraction result channel. Extractions are rare
/// and one-at-a-time per draft; a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// How long the auto-save indicator shows "saving" after a mutation.
const AUTOSAVE_FLIP: Duration = Duration::from_secs(1);

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingStaff,
    EditingCollege,
    EditingSport,
    VisibilityDialog,
    ConfirmingDeleteSport,
    ConfirmingDeleteStaff,
    ShowingWarnings,
    Importing,
    Exporting,
    ShowingHelp,
    Quitting,
}

/// Which half of the staff edit panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFocus {
    Fields,
    BulkInput,
}

/// Cosmetic auto-save indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSaveStatus {
    Saved,
    Saving,
}

/// An in-progress staff edit: which row, the buffered draft, the focused
/// field, and the bulk-input extraction panel.
#[derive(Debug)]
pub struct EditContext {
    pub sport_idx: usize,
    pub staff_idx: usize,
    pub draft: StaffDraft,
    pub field: StaffField,
    pub focus: EditFocus,
    pub bulk_input: String,
    pub response_text: String,
}

impl EditContext {
    fn new(sport_idx: usize, staff_idx: usize, draft: StaffDraft) -> Self {
        Self {
            sport_idx,
            staff_idx,
            draft,
            field: StaffField::Title,
            focus: EditFocus::Fields,
            bulk_input: String::new(),
            response_text: String::new(),
        }
    }
}

/// Result of a spawned extraction task.
enum ExtractResult {
    Done(Extraction),
    Failed(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub store: RosterStore,

    pub state: AppState,
    pub status_message: Option<String>,

    // Selection
    pub sport_selection: usize,
    pub staff_selection: usize,

    // Inline field editors (college / sport headers)
    pub college_field: CollegeField,
    pub sport_field: SportField,
    pub field_buffer: String,

    // Visibility dialog cursor
    pub visibility_selection: usize,

    // Staff edit
    pub edit: Option<EditContext>,

    // Navigation guard
    pub warnings: Option<WarningReport>,
    pending_nav: Option<NavDirection>,

    // Import/export path prompt
    pub prompt_buffer: String,

    // Extraction
    pub extracting: bool,
    extract_rx: mpsc::Receiver<ExtractResult>,
    extract_tx: mpsc::Sender<ExtractResult>,

    // Auto-save indicator (cosmetic, writes nothing)
    dirty_at: Option<Instant>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            config,
            store: RosterStore::new(),
            state: AppState::Normal,
            status_message: None,
            sport_selection: 0,
            staff_selection: 0,
            college_field: CollegeField::Name,
            sport_field: SportField::Name,
            field_buffer: String::new(),
            visibility_selection: 0,
            edit: None,
            warnings: None,
            pending_nav: None,
            prompt_buffer: String::new(),
            extracting: false,
            extract_rx: rx,
            extract_tx: tx,
            dirty_at: None,
        }
    }

    /// Mark the document changed; the status bar shows "saving" for a
    /// second afterwards.
    fn mark_dirty(&mut self) {
        self.dirty_at = Some(Instant::now());
    }

    pub fn autosave_status(&self) -> AutoSaveStatus {
        match self.dirty_at {
            Some(at) if at.elapsed() < AUTOSAVE_FLIP => AutoSaveStatus::Saving,
            _ => AutoSaveStatus::Saved,
        }
    }

    /// Pull the sport/staff cursors back in range after a mutation.
    pub fn clamp_selections(&mut self) {
        let sport_count = self.store.current().map(|c| c.sports.len()).unwrap_or(0);
        if self.sport_selection >= sport_count {
            self.sport_selection = sport_count.saturating_sub(1);
        }
        let staff_count = self
            .store
            .sport(self.sport_selection)
            .map(|s| s.staff.len())
            .unwrap_or(0);
        if self.staff_selection >= staff_count {
            self.staff_selection = staff_count.saturating_sub(1);
        }
    }

    // =========================================================================
    // College / sport / staff operations
    // =========================================================================

    pub fn add_college(&mut self) {
        self.store.add_college();
        self.discard_transient_state();
        self.mark_dirty();
    }

    pub fn add_sport(&mut self) {
        if let Some(idx) = self.store.add_sport() {
            self.sport_selection = idx;
            self.staff_selection = 0;
            self.mark_dirty();
        }
    }

    pub fn delete_selected_sport(&mut self) {
        self.store.delete_sport(self.sport_selection);
        self.clamp_selections();
        self.state = AppState::Normal;
        self.mark_dirty();
    }

    /// Append a blank staff row and immediately enter edit mode for it,
    /// bulk-input panel open - the usual flow is paste-then-extract.
    pub fn add_staff(&mut self) {
        let Some(staff_idx) = self.store.add_staff(self.sport_selection) else {
            return;
        };
        self.staff_selection = staff_idx;
        self.mark_dirty();
        self.start_staff_edit();
    }

    pub fn start_staff_edit(&mut self) {
        let Some(staff) = self.store.staff(self.sport_selection, self.staff_selection) else {
            return;
        };
        self.edit = Some(EditContext::new(
            self.sport_selection,
            self.staff_selection,
            StaffDraft::new(staff),
        ));
        self.state = AppState::EditingStaff;
    }

    /// Validate and commit the draft. On failure the draft (and its
    /// errors) stay in place for correction.
    pub fn save_staff_edit(&mut self) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if !edit.draft.validate() {
            debug!("Staff save rejected by validation");
            return;
        }
        let committed = edit.draft.committed();
        let (sport_idx, staff_idx) = (edit.sport_idx, edit.staff_idx);
        self.store.commit_staff(sport_idx, staff_idx, committed);
        self.edit = None;
        self.state = AppState::Normal;
        self.mark_dirty();
    }

    pub fn cancel_staff_edit(&mut self) {
        self.edit = None;
        self.state = AppState::Normal;
    }

    pub fn delete_selected_staff(&mut self) {
        self.store
            .delete_staff(self.sport_selection, self.staff_selection);
        self.clamp_selections();
        self.state = AppState::Normal;
        self.mark_dirty();
    }

    pub fn apply_preset(&mut self, preset: VisibilityPreset) {
        self.store
            .set_visibility_preset(self.sport_selection, self.staff_selection, preset);
        self.mark_dirty();
    }

    /// Cycle the flag under the visibility-dialog cursor.
    pub fn cycle_selected_flag(&mut self) {
        let field = VisibilityField::ALL[self.visibility_selection % VisibilityField::ALL.len()];
        let Some(current) = self
            .store
            .staff(self.sport_selection, self.staff_selection)
            .map(|s| s.flag(field))
        else {
            return;
        };
        self.set_flag(field, current.cycled());
    }

    pub fn set_flag(&mut self, field: VisibilityField, value: Flag) {
        self.store
            .set_visibility_flag(self.sport_selection, self.staff_selection, field, value);
        self.mark_dirty();
    }

    // =========================================================================
    // Inline field editors
    // =========================================================================

    pub fn start_college_edit(&mut self) {
        if self.store.current().is_none() {
            return;
        }
        self.college_field = CollegeField::Name;
        self.field_buffer = self.store.college_field(self.college_field).to_string();
        self.state = AppState::EditingCollege;
    }

    pub fn commit_college_field(&mut self) {
        self.store
            .update_college_field(self.college_field, std::mem::take(&mut self.field_buffer));
        self.mark_dirty();
    }

    /// Commit the focused college field and move to the next one.
    pub fn next_college_field(&mut self) {
        self.commit_college_field();
        let idx = CollegeField::ALL
            .iter()
            .position(|&f| f == self.college_field)
            .unwrap_or(0);
        self.college_field = CollegeField::ALL[(idx + 1) % CollegeField::ALL.len()];
        self.field_buffer = self.store.college_field(self.college_field).to_string();
    }

    pub fn start_sport_edit(&mut self) {
        let Some(sport) = self.store.sport(self.sport_selection) else {
            return;
        };
        self.sport_field = SportField::Name;
        self.field_buffer = sport.name.clone();
        self.state = AppState::EditingSport;
    }

    pub fn commit_sport_field(&mut self) {
        self.store.update_sport_field(
            self.sport_selection,
            self.sport_field,
            std::mem::take(&mut self.field_buffer),
        );
        self.mark_dirty();
    }

    pub fn next_sport_field(&mut self) {
        self.commit_sport_field();
        let idx = SportField::ALL
            .iter()
            .position(|&f| f == self.sport_field)
            .unwrap_or(0);
        self.sport_field = SportField::ALL[(idx + 1) % SportField::ALL.len()];
        let Some(sport) = self.store.sport(self.sport_selection) else {
            return;
        };
        self.field_buffer = match self.sport_field {
            SportField::Name => sport.name.clone(),
            SportField::Division => sport.division.clone(),
            SportField::Conference => sport.conference.clone(),
            SportField::CoachDirectoryLink => sport.coach_directory_link.clone(),
        };
    }

    // =========================================================================
    // Navigation guard
    // =========================================================================

    /// Ask to move to the previous/next college. If the current college
    /// has data-quality warnings, navigation is suspended behind an
    /// advisory dialog; otherwise it happens immediately.
    pub fn request_navigation(&mut self, direction: NavDirection) {
        if !self.store.can_navigate(direction) {
            return;
        }
        match self.store.current_warnings() {
            Some(report) => {
                debug!(?direction, "Navigation suspended on warnings");
                self.warnings = Some(report);
                self.pending_nav = Some(direction);
                self.state = AppState::ShowingWarnings;
            }
            None => self.perform_navigation(direction),
        }
    }

    /// User chose "proceed anyway".
    pub fn proceed_navigation(&mut self) {
        self.warnings = None;
        self.state = AppState::Normal;
        if let Some(direction) = self.pending_nav.take() {
            self.perform_navigation(direction);
        }
    }

    /// User chose "stay here".
    pub fn cancel_navigation(&mut self) {
        self.warnings = None;
        self.pending_nav = None;
        self.state = AppState::Normal;
    }

    fn perform_navigation(&mut self, direction: NavDirection) {
        self.store.navigate(direction);
        self.discard_transient_state();
    }

    /// Moving between colleges throws away any in-progress staff edit,
    /// the bulk-input panel, and open dialogs.
    fn discard_transient_state(&mut self) {
        self.edit = None;
        self.warnings = None;
        self.pending_nav = None;
        self.sport_selection = 0;
        self.staff_selection = 0;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    pub fn start_import(&mut self) {
        self.prompt_buffer.clear();
        self.state = AppState::Importing;
    }

    pub fn start_export(&mut self) {
        self.prompt_buffer = self
            .config
            .export_dir()
            .join(files::EXPORT_FILE_NAME)
            .display()
            .to_string();
        self.state = AppState::Exporting;
    }

    /// Run the pending import. Malformed files leave prior state intact.
    pub fn finish_import(&mut self) {
        let path = std::path::PathBuf::from(self.prompt_buffer.trim());
        match files::import_roster(&path) {
            Ok(colleges) => {
                self.store.replace(colleges);
                self.discard_transient_state();
                self.status_message = Some(format!("Imported {} colleges", self.store.len()));
                self.mark_dirty();
            }
            Err(e) => {
                warn!(error = %e, "Import failed");
                self.status_message = Some(format!("Import failed: {}", e));
                self.state = AppState::Normal;
            }
        }
    }

    pub fn finish_export(&mut self) {
        let path = std::path::PathBuf::from(self.prompt_buffer.trim());
        match files::export_roster(&path, self.store.colleges()) {
            Ok(()) => {
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Text extraction
    // =========================================================================

    /// Spawn an extraction call for the draft's bulk input. The trigger
    /// is disabled while a call is outstanding; nothing else is blocked,
    /// and there is no cancellation - whichever response arrives while a
    /// draft is current wins.
    pub fn start_extraction(&mut self) {
        if self.extracting {
            return;
        }
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if edit.bulk_input.is_empty() {
            return;
        }

        let client = match ExtractClient::new(
            self.config.api_key().unwrap_or_default(),
            self.config.model(),
        ) {
            Ok(c) => c,
            Err(e) => {
                edit.response_text = e.to_string();
                return;
            }
        };

        let text = edit.bulk_input.clone();
        edit.response_text = "Processing...".to_string();
        self.extracting = true;

        let tx = self.extract_tx.clone();
        tokio::spawn(async move {
            let result = match client.extract_staff(&text).await {
                Ok(extraction) => ExtractResult::Done(extraction),
                Err(e) => ExtractResult::Failed(e.to_string()),
            };
            if tx.send(result).await.is_err() {
                error!("Failed to send extraction result - channel closed");
            }
        });
        info!("Extraction request spawned");
    }

    /// Drain completed background tasks. Called once per event-loop tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.extract_rx.try_recv() {
            self.process_extract_result(result);
        }
    }

    fn process_extract_result(&mut self, result: ExtractResult) {
        self.extracting = false;
        let Some(edit) = self.edit.as_mut() else {
            // Draft was discarded while the call was in flight; the
            // response has nowhere to go.
            debug!("Extraction result dropped - no active draft");
            return;
        };
        match result {
            ExtractResult::Done(extraction) => {
                let staff = extraction.staff;
                // Missing fields become empty strings, not null: drafts
                // hold text, and existing exports never carry null here.
                edit.draft
                    .set_field(StaffField::Title, staff.title.unwrap_or_default());
                edit.draft
                    .set_field(StaffField::First, staff.first_name.unwrap_or_default());
                edit.draft
                    .set_field(StaffField::Middle, staff.middle_name.unwrap_or_default());
                edit.draft
                    .set_field(StaffField::Last, staff.last_name.unwrap_or_default());
                edit.draft
                    .set_field(StaffField::Email, staff.email.unwrap_or_default());
                edit.draft
                    .set_field(StaffField::Phone, staff.phone.unwrap_or_default());

                edit.response_text = extraction.raw_text;
                if extraction.extra_count > 0 {
                    edit.response_text.push_str(&format!(
                        "\n\nNote: {} more staff member(s) detected. Only the first was populated.",
                        extraction.extra_count
                    ));
                }
            }
            ExtractResult::Failed(message) => {
                warn!(error = %message, "Extraction failed");
                edit.response_text = message;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExtractedStaff;
    use crate::models::StaffField;

    fn app_with_college() -> App {
        let mut app = App::new(Config::default());
        app.add_college();
        app
    }

    #[test]
    fn next_on_single_college_is_noop() {
        let mut app = app_with_college();
        app.request_navigation(NavDirection::Next);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.store.current_index(), Some(0));
    }

    #[test]
    fn guard_suspends_navigation_on_warnings() {
        let mut app = app_with_college();
        app.add_sport(); // empty sport -> no_coaches warning
        app.add_college();
        app.request_navigation(NavDirection::Previous);
        // Second college is clean; navigating back lands on the first,
        // and the next move forward trips the guard
        assert_eq!(app.store.current_index(), Some(0));
        app.request_navigation(NavDirection::Next);
        assert_eq!(app.state, AppState::ShowingWarnings);
        let report = app.warnings.as_ref().expect("report expected");
        assert_eq!(report.no_coaches, vec!["New Sport"]);
        // Pointer has not moved yet
        assert_eq!(app.store.current_index(), Some(0));
    }

    #[test]
    fn proceed_commits_navigation_and_discards_edit() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff(); // enters edit mode
        assert!(app.edit.is_some());
        app.add_college();
        // add_college moved us to college 2 and discarded the edit; set
        // up an edit on college 1 and navigate away through the guard
        app.request_navigation(NavDirection::Previous);
        app.start_staff_edit();
        assert!(app.edit.is_some());
        app.request_navigation(NavDirection::Next);
        assert_eq!(app.state, AppState::ShowingWarnings);
        app.proceed_navigation();
        assert_eq!(app.store.current_index(), Some(1));
        assert!(app.edit.is_none());
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn stay_cancels_navigation_and_clears_report() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_college();
        app.request_navigation(NavDirection::Previous);
        app.request_navigation(NavDirection::Next);
        assert_eq!(app.state, AppState::ShowingWarnings);
        app.cancel_navigation();
        assert_eq!(app.store.current_index(), Some(0));
        assert!(app.warnings.is_none());
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn save_with_bad_email_keeps_editing() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        let edit = app.edit.as_mut().unwrap();
        edit.draft.set_field(StaffField::Email, "bad-email".to_string());
        app.save_staff_edit();
        assert_eq!(app.state, AppState::EditingStaff);
        let edit = app.edit.as_ref().unwrap();
        assert!(edit.draft.errors.email.is_some());
        assert_eq!(edit.draft.staff.email, "bad-email");
    }

    #[test]
    fn save_canonicalizes_phone_into_store() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        let edit = app.edit.as_mut().unwrap();
        edit.draft.set_field(StaffField::Phone, "5551234567".to_string());
        app.save_staff_edit();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.store.staff(0, 0).unwrap().phone, "555-123-4567");
    }

    #[test]
    fn cancel_discards_draft_changes() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        let edit = app.edit.as_mut().unwrap();
        edit.draft.set_field(StaffField::First, "Jane".to_string());
        app.cancel_staff_edit();
        assert_eq!(app.store.staff(0, 0).unwrap().first_name, "");
    }

    #[test]
    fn extraction_result_fills_draft_with_empty_for_missing() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        app.extracting = true;
        app.process_extract_result(ExtractResult::Done(Extraction {
            staff: ExtractedStaff {
                title: Some("Head Coach".to_string()),
                first_name: Some("John".to_string()),
                middle_name: None,
                last_name: Some("Smith".to_string()),
                email: None,
                phone: Some("(555) 123-4567".to_string()),
            },
            extra_count: 1,
            raw_text: "[...]".to_string(),
        }));
        assert!(!app.extracting);
        let edit = app.edit.as_ref().unwrap();
        assert_eq!(edit.draft.staff.title, "Head Coach");
        assert_eq!(edit.draft.staff.middle_name, "");
        assert_eq!(edit.draft.staff.email, "");
        assert_eq!(edit.draft.staff.name, "John Smith");
        assert_eq!(edit.draft.staff.phone, "555-123-4567");
        assert!(edit.draft.staff.email.is_empty());
        assert!(edit.response_text.contains("Only the first was populated"));
    }

    #[test]
    fn extraction_failure_leaves_draft_untouched() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        let edit = app.edit.as_mut().unwrap();
        edit.draft.set_field(StaffField::First, "Jane".to_string());
        app.extracting = true;
        app.process_extract_result(ExtractResult::Failed("Network error".to_string()));
        let edit = app.edit.as_ref().unwrap();
        assert_eq!(edit.draft.staff.first_name, "Jane");
        assert_eq!(edit.response_text, "Network error");
    }

    #[test]
    fn late_extraction_without_draft_is_dropped() {
        let mut app = app_with_college();
        app.extracting = true;
        app.process_extract_result(ExtractResult::Failed("too late".to_string()));
        assert!(!app.extracting);
        assert!(app.edit.is_none());
    }

    #[test]
    fn add_staff_enters_edit_mode() {
        let mut app = app_with_college();
        app.add_sport();
        app.add_staff();
        assert_eq!(app.state, AppState::EditingStaff);
        let edit = app.edit.as_ref().unwrap();
        assert_eq!((edit.sport_idx, edit.staff_idx), (0, 0));
    }

    #[test]
    fn college_field_editor_updates_lowercase_name() {
        let mut app = app_with_college();
        app.start_college_edit();
        app.field_buffer = "Big State University".to_string();
        app.commit_college_field();
        let college = app.store.current().unwrap();
        assert_eq!(college.official_name_lowercase, "big state university");
    }

    #[test]
    fn autosave_flips_to_saving_on_mutation() {
        let mut app = app_with_college();
        assert_eq!(app.autosave_status(), AutoSaveStatus::Saving);
        app.dirty_at = Some(Instant::now() - Duration::from_secs(2));
        assert_eq!(app.autosave_status(), AutoSaveStatus::Saved);
    }
}
