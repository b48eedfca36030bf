//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, EditFocus};
use crate::models::{VisibilityField, VisibilityPreset};
use crate::roster::NavDirection;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle the navigation-guard warning dialog
    if matches!(app.state, AppState::ShowingWarnings) {
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => {
                app.proceed_navigation();
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                app.cancel_navigation();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmations
    if matches!(app.state, AppState::ConfirmingDeleteSport) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.delete_selected_sport();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }
    if matches!(app.state, AppState::ConfirmingDeleteStaff) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.delete_selected_staff();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle the visibility dialog
    if matches!(app.state, AppState::VisibilityDialog) {
        match key.code {
            KeyCode::Up => {
                let n = VisibilityField::ALL.len();
                app.visibility_selection = (app.visibility_selection + n - 1) % n;
            }
            KeyCode::Down => {
                app.visibility_selection =
                    (app.visibility_selection + 1) % VisibilityField::ALL.len();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                app.cycle_selected_flag();
            }
            KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q') => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle import/export path prompts
    if matches!(app.state, AppState::Importing | AppState::Exporting) {
        return handle_prompt_input(app, key);
    }

    // Handle the staff editor
    if matches!(app.state, AppState::EditingStaff) {
        return handle_staff_edit_input(app, key);
    }

    // Handle inline college/sport field editing
    if matches!(app.state, AppState::EditingCollege) {
        match key.code {
            KeyCode::Tab => app.next_college_field(),
            KeyCode::Enter => {
                app.commit_college_field();
                app.state = AppState::Normal;
            }
            KeyCode::Esc => {
                app.field_buffer.clear();
                app.state = AppState::Normal;
            }
            KeyCode::Backspace => {
                app.field_buffer.pop();
            }
            KeyCode::Char(c) => app.field_buffer.push(c),
            _ => {}
        }
        return Ok(false);
    }
    if matches!(app.state, AppState::EditingSport) {
        match key.code {
            KeyCode::Tab => app.next_sport_field(),
            KeyCode::Enter => {
                app.commit_sport_field();
                app.state = AppState::Normal;
            }
            KeyCode::Esc => {
                app.field_buffer.clear();
                app.state = AppState::Normal;
            }
            KeyCode::Backspace => {
                app.field_buffer.pop();
            }
            KeyCode::Char(c) => app.field_buffer.push(c),
            _ => {}
        }
        return Ok(false);
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Left => app.request_navigation(NavDirection::Previous),
        KeyCode::Right => app.request_navigation(NavDirection::Next),
        KeyCode::Up => {
            app.staff_selection = app.staff_selection.saturating_sub(1);
        }
        KeyCode::Down => {
            app.staff_selection += 1;
            app.clamp_selections();
        }
        KeyCode::Tab => {
            app.sport_selection += 1;
            app.staff_selection = 0;
            app.clamp_selections();
        }
        KeyCode::BackTab => {
            app.sport_selection = app.sport_selection.saturating_sub(1);
            app.staff_selection = 0;
        }
        KeyCode::Char('n') => app.add_college(),
        KeyCode::Char('c') => app.start_college_edit(),
        KeyCode::Char('s') => app.add_sport(),
        KeyCode::Char('S') => app.start_sport_edit(),
        KeyCode::Char('D') => {
            if app.store.sport(app.sport_selection).is_some() {
                app.state = AppState::ConfirmingDeleteSport;
            }
        }
        KeyCode::Char('a') => app.add_staff(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_staff_edit(),
        KeyCode::Char('d') => {
            if app
                .store
                .staff(app.sport_selection, app.staff_selection)
                .is_some()
            {
                app.state = AppState::ConfirmingDeleteStaff;
            }
        }
        KeyCode::Char('v') => app.apply_preset(VisibilityPreset::Visible),
        KeyCode::Char('h') => app.apply_preset(VisibilityPreset::Hidden),
        KeyCode::Char('g') => {
            if app
                .store
                .staff(app.sport_selection, app.staff_selection)
                .is_some()
            {
                app.visibility_selection = 0;
                app.state = AppState::VisibilityDialog;
            }
        }
        KeyCode::Char('o') => app.start_import(),
        KeyCode::Char('w') => app.start_export(),
        _ => {}
    }

    Ok(false)
}

/// Import/export prompts share one line-edit buffer.
fn handle_prompt_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            if app.prompt_buffer.trim().is_empty() {
                app.state = AppState::Normal;
            } else if app.state == AppState::Importing {
                app.finish_import();
            } else {
                app.finish_export();
            }
        }
        KeyCode::Esc => {
            app.prompt_buffer.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.prompt_buffer.pop();
        }
        KeyCode::Char(c) => app.prompt_buffer.push(c),
        _ => {}
    }
    Ok(false)
}

fn handle_staff_edit_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+Q fires an extraction from either pane
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_extraction();
        return Ok(false);
    }
    // Ctrl+B toggles between the field grid and the bulk-input pane
    if key.code == KeyCode::Char('b') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if let Some(edit) = app.edit.as_mut() {
            edit.focus = match edit.focus {
                EditFocus::Fields => EditFocus::BulkInput,
                EditFocus::BulkInput => EditFocus::Fields,
            };
        }
        return Ok(false);
    }

    let Some(focus) = app.edit.as_ref().map(|e| e.focus) else {
        app.state = AppState::Normal;
        return Ok(false);
    };

    // Enter/Esc drop the edit context, so they run against App directly
    match (focus, key.code) {
        (EditFocus::Fields, KeyCode::Enter) => {
            app.save_staff_edit();
            return Ok(false);
        }
        (_, KeyCode::Esc) => {
            app.cancel_staff_edit();
            return Ok(false);
        }
        _ => {}
    }

    let Some(edit) = app.edit.as_mut() else {
        return Ok(false);
    };
    match focus {
        EditFocus::Fields => match key.code {
            KeyCode::Tab => edit.field = edit.field.next(),
            KeyCode::BackTab => edit.field = edit.field.prev(),
            KeyCode::Backspace => {
                let mut value = edit.draft.field(edit.field).to_string();
                value.pop();
                edit.draft.set_field(edit.field, value);
            }
            KeyCode::Char(c) => {
                let mut value = edit.draft.field(edit.field).to_string();
                value.push(c);
                edit.draft.set_field(edit.field, value);
            }
            _ => {}
        },
        EditFocus::BulkInput => match key.code {
            KeyCode::Enter => edit.bulk_input.push('\n'),
            KeyCode::Backspace => {
                edit.bulk_input.pop();
            }
            KeyCode::Char(c) => edit.bulk_input.push(c),
            _ => {}
        },
    }

    Ok(false)
}
