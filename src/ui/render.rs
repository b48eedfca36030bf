use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, AutoSaveStatus, EditFocus};
use crate::models::{
    CollegeField, Sport, SportField, Staff, StaffField, VisibilityField, VisibilityStatus,
};
use crate::roster::NavDirection;
use crate::utils::truncate;

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(7), // College header
            Constraint::Min(10),   // Sports and staff
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_college_header(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingWarnings => render_warnings_overlay(frame, app),
        AppState::ConfirmingDeleteSport => render_confirm_overlay(
            frame,
            "Delete Sport",
            "Delete this sport and all its staff? [y/n]",
        ),
        AppState::ConfirmingDeleteStaff => {
            render_confirm_overlay(frame, "Delete Staff", "Delete this staff member? [y/n]")
        }
        AppState::VisibilityDialog => render_visibility_overlay(frame, app),
        AppState::Importing => render_prompt_overlay(frame, app, "Import roster from"),
        AppState::Exporting => render_prompt_overlay(frame, app, "Export roster to"),
        AppState::ShowingHelp => render_help_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Courtside";
    let autosave = match app.autosave_status() {
        AutoSaveStatus::Saved => ("Saved", styles::success_style()),
        AutoSaveStatus::Saving => ("Saving...", styles::warning_style()),
    };
    let position = if app.store.is_empty() {
        "No colleges".to_string()
    } else {
        match app.store.current_index() {
            Some(idx) => format!("College {} of {}", idx + 1, app.store.len()),
            None => String::new(),
        }
    };
    let help_hint = "[?] Help";

    let right = format!("{}  {}  {}", autosave.0, position, help_hint);
    let padding = (area.width as usize).saturating_sub(title.len() + right.len() + 4);

    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(autosave.0, autosave.1),
        Span::raw("  "),
        Span::styled(position, styles::muted_style()),
        Span::raw("  "),
        Span::styled(help_hint, styles::muted_style()),
        Span::raw("  "),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_college_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::EditingCollege));

    let Some(college) = app.store.current() else {
        let lines = vec![
            Line::from(Span::styled(
                "No colleges loaded",
                styles::highlight_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[o] import a roster file    [n] create a new college",
                styles::muted_style(),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(block.title(" Get Started ")),
            area,
        );
        return;
    };

    let left_arrow = if app.store.can_navigate(NavDirection::Previous) {
        Span::styled("< ", styles::highlight_style())
    } else {
        Span::styled("< ", styles::muted_style())
    };
    let right_arrow = if app.store.can_navigate(NavDirection::Next) {
        Span::styled(" >", styles::highlight_style())
    } else {
        Span::styled(" >", styles::muted_style())
    };

    let name_line = Line::from(vec![
        left_arrow,
        Span::styled(
            field_text(app, CollegeField::Name, &college.official_name),
            styles::title_style(),
        ),
        right_arrow,
    ]);

    let field_line = |field: CollegeField, value: &str| -> Line<'static> {
        let focused = app.state == AppState::EditingCollege && app.college_field == field;
        let shown = field_text(app, field, value);
        Line::from(vec![
            Span::styled(format!("{}: ", field.label()), styles::muted_style()),
            Span::styled(
                shown,
                if focused {
                    styles::selected_style()
                } else {
                    styles::help_desc_style()
                },
            ),
        ])
    };

    let lines = vec![
        name_line,
        field_line(CollegeField::State, &college.state_province),
        field_line(CollegeField::Division, &college.division_ncaa),
        field_line(CollegeField::CollegeWebsite, &college.college_website_url),
        field_line(CollegeField::AthleticWebsite, &college.athletic_website_url),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Show the edit buffer (with a cursor mark) for the focused college
/// field, the stored value otherwise.
fn field_text(app: &App, field: CollegeField, stored: &str) -> String {
    if app.state == AppState::EditingCollege && app.college_field == field {
        format!("{}_", app.field_buffer)
    } else {
        stored.to_string()
    }
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let Some(college) = app.store.current() else {
        return;
    };

    if college.sports.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "No sports added yet. [s] adds the first one.",
            styles::muted_style(),
        )))
        .block(Block::default().borders(Borders::ALL).title(" Sports "));
        frame.render_widget(para, area);
        return;
    }

    // Editing splits the area: staff table on top, bulk panel below
    let (table_area, bulk_area) = if app.state == AppState::EditingStaff {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)])
            .split(area);
        (halves[0], Some(halves[1]))
    } else {
        (area, None)
    };

    render_sports(frame, app, college.sports.as_slice(), table_area);

    if let Some(bulk_area) = bulk_area {
        render_bulk_panel(frame, app, bulk_area);
    }
}

fn render_sports(frame: &mut Frame, app: &App, sports: &[Sport], area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for (sport_idx, sport) in sports.iter().enumerate() {
        let selected = sport_idx == app.sport_selection;
        lines.push(sport_header_line(app, sport, selected));

        if !selected {
            continue;
        }

        // Staff table for the selected sport only
        lines.push(Line::from(Span::styled(
            format!(
                "    {:^3} {:16} {:12} {:12} {:14} {:26} {:14}",
                "Vis", "Title", "First", "Middle", "Last", "Email", "Phone"
            ),
            styles::muted_style(),
        )));

        if sport.staff.is_empty() {
            lines.push(Line::from(Span::styled(
                "    No staff members yet. [a] adds one.",
                styles::muted_style(),
            )));
            continue;
        }

        for (staff_idx, staff) in sport.staff.iter().enumerate() {
            lines.push(staff_row(app, staff, sport_idx, staff_idx));
            if let Some(errors) = staff_errors(app, sport_idx, staff_idx) {
                lines.push(errors);
            }
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sports ")
        .border_style(styles::border_style(app.state == AppState::Normal));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn sport_header_line<'a>(app: &App, sport: &'a Sport, selected: bool) -> Line<'a> {
    let editing = app.state == AppState::EditingSport && selected;
    let field = |f: SportField, value: &str| -> String {
        if editing && app.sport_field == f {
            format!("{}_", app.field_buffer)
        } else {
            value.to_string()
        }
    };

    let marker = if selected { "> " } else { "  " };
    let text = format!(
        "{}{}  div {}  {}  {}",
        marker,
        field(SportField::Name, sport.display_name()),
        field(SportField::Division, &sport.division),
        field(SportField::Conference, &sport.conference),
        truncate(&field(SportField::CoachDirectoryLink, &sport.coach_directory_link), 40),
    );
    let style = if selected {
        styles::selected_style()
    } else {
        styles::muted_style()
    };
    Line::from(Span::styled(text, style))
}

fn staff_row<'a>(app: &App, staff: &'a Staff, sport_idx: usize, staff_idx: usize) -> Line<'a> {
    let status = staff.visibility_status();
    let dot = match status {
        VisibilityStatus::Visible => "V",
        VisibilityStatus::Hidden => "H",
        VisibilityStatus::Custom => "C",
    };

    let editing = app
        .edit
        .as_ref()
        .filter(|e| e.sport_idx == sport_idx && e.staff_idx == staff_idx);

    if let Some(edit) = editing {
        let cell = |f: StaffField, width: usize| -> Span<'static> {
            let focused = edit.focus == EditFocus::Fields && edit.field == f;
            let text = if focused {
                format!("{:w$}", format!("{}_", edit.draft.field(f)), w = width)
            } else {
                format!("{:w$}", edit.draft.field(f), w = width)
            };
            Span::styled(
                text,
                if focused {
                    styles::selected_style()
                } else {
                    styles::highlight_style()
                },
            )
        };
        let mut spans = vec![
            Span::raw("    "),
            Span::styled(format!("{:^3} ", dot), styles::visibility_style(status)),
        ];
        spans.push(cell(StaffField::Title, 17));
        spans.push(cell(StaffField::First, 13));
        spans.push(cell(StaffField::Middle, 13));
        spans.push(cell(StaffField::Last, 15));
        spans.push(cell(StaffField::Email, 27));
        spans.push(cell(StaffField::Phone, 14));
        return Line::from(spans);
    }

    let selected =
        sport_idx == app.sport_selection && staff_idx == app.staff_selection && app.edit.is_none();
    let text = format!(
        "    {:^3} {:16} {:12} {:12} {:14} {:26} {:14}",
        dot,
        truncate(&staff.title, 16),
        truncate(&staff.first_name, 12),
        truncate(&staff.middle_name, 12),
        truncate(&staff.last_name, 14),
        truncate(&staff.email, 26),
        staff.phone,
    );
    let style = if selected {
        styles::selected_style()
    } else {
        styles::help_desc_style()
    };
    Line::from(vec![Span::styled(text, style)])
}

/// Inline validation errors for the row being edited, if any.
fn staff_errors(app: &App, sport_idx: usize, staff_idx: usize) -> Option<Line<'static>> {
    let edit = app.edit.as_ref()?;
    if edit.sport_idx != sport_idx || edit.staff_idx != staff_idx {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(ref e) = edit.draft.errors.email {
        parts.push(format!("email: {}", e));
    }
    if let Some(ref e) = edit.draft.errors.phone {
        parts.push(format!("phone: {}", e));
    }
    if parts.is_empty() {
        return None;
    }
    Some(Line::from(Span::styled(
        format!("        {}", parts.join("  |  ")),
        styles::error_style(),
    )))
}

fn render_bulk_panel(frame: &mut Frame, app: &App, area: Rect) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let input_title = if app.extracting {
        " Paste Staff Text (processing...) "
    } else {
        " Paste Staff Text [Ctrl+Q: extract] "
    };
    let input = Paragraph::new(edit.bulk_input.as_str())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(input_title)
                .border_style(styles::border_style(edit.focus == EditFocus::BulkInput)),
        );
    frame.render_widget(input, halves[0]);

    let response = Paragraph::new(edit.response_text.as_str())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Extraction Response ")
                .border_style(styles::muted_style()),
        );
    frame.render_widget(response, halves[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.state {
        AppState::EditingStaff => match app.edit.as_ref() {
            Some(edit) => format!(
                "{} | Tab next field | Ctrl+B bulk | Enter save | Esc cancel",
                edit.field.label()
            ),
            None => String::new(),
        },
        AppState::EditingCollege => format!(
            "{} | Tab next field | Enter done | Esc cancel",
            app.college_field.label()
        ),
        AppState::EditingSport => format!(
            "{} | Tab next field | Enter done | Esc cancel",
            app.sport_field.label()
        ),
        _ => "arrows navigate | [a]dd staff | [e]dit | [v]/[h] presets | [q]uit".to_string(),
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        String::from(" ")
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

fn render_warnings_overlay(frame: &mut Frame, app: &App) {
    let Some(report) = app.warnings.as_ref() else {
        return;
    };
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Issues found with the current college. Review or proceed anyway.",
            styles::help_desc_style(),
        )),
        Line::from(""),
    ];

    let mut section = |title: &str, sports: &[String]| {
        if sports.is_empty() {
            return;
        }
        lines.push(Line::from(Span::styled(
            title.to_string(),
            styles::warning_style(),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", sports.join(", ")),
            styles::help_desc_style(),
        )));
        lines.push(Line::from(""));
    };

    section("Sports with no coaches:", &report.no_coaches);
    section("Sports with coaches missing emails:", &report.no_emails);
    section(
        "Sports with coaches using custom visibility:",
        &report.custom_visibility,
    );
    section(
        "Sports with completely hidden coaches:",
        &report.hidden_coaches,
    );
    section("Sports with inactive coaches:", &report.inactive_coaches);

    lines.push(Line::from(vec![
        Span::styled("[p]", styles::help_key_style()),
        Span::raw(" proceed anyway    "),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::raw(" stay here"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Data Quality Warnings ")
        .border_style(styles::error_style());
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_visibility_overlay(frame: &mut Frame, app: &App) {
    let Some(staff) = app.store.staff(app.sport_selection, app.staff_selection) else {
        return;
    };
    let area = centered_rect_fixed(44, 12, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (i, field) in VisibilityField::ALL.iter().enumerate() {
        let selected = i == app.visibility_selection % VisibilityField::ALL.len();
        let marker = if selected { "> " } else { "  " };
        let flag = staff.flag(*field);
        lines.push(Line::from(Span::styled(
            format!("{}{:22} {}", marker, field.label(), flag.label()),
            if selected {
                styles::selected_style()
            } else {
                styles::help_desc_style()
            },
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Space cycles | Esc done",
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Visibility: {} ", staff.visibility_status().label()))
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_prompt_overlay(frame: &mut Frame, app: &App, title: &str) {
    let area = centered_rect_fixed(60, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            format!("{}_", app.prompt_buffer),
            styles::help_desc_style(),
        )),
        Line::from(Span::styled("Enter confirm | Esc cancel", styles::muted_style())),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect_fixed(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(styles::error_style());
    frame.render_widget(
        Paragraph::new(Line::from(message.to_string())).block(block),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 22, frame.area());
    frame.render_widget(Clear, area);

    let keys: &[(&str, &str)] = &[
        ("Left/Right", "previous/next college"),
        ("Up/Down", "select staff row"),
        ("Tab/BackTab", "select sport"),
        ("n", "new college"),
        ("c", "edit college fields"),
        ("s", "add sport"),
        ("S", "edit sport fields"),
        ("D", "delete sport"),
        ("a", "add staff (opens editor)"),
        ("e / Enter", "edit selected staff"),
        ("d", "delete staff"),
        ("v / h", "visible / hidden preset"),
        ("g", "custom visibility dialog"),
        ("o / w", "import / export roster"),
        ("Ctrl+Q", "extract staff from pasted text"),
        ("?", "this help"),
        ("q / Ctrl+C", "quit"),
    ];

    let mut lines = Vec::new();
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:12}", key), styles::help_key_style()),
            Span::styled(*desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Percentage-based centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Fixed-size centered rectangle, clamped to the frame.
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
