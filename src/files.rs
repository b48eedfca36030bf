//! Whole-document JSON import and export.
//!
//! Import accepts either a single college object or an array of colleges
//! and replaces the entire in-memory roster; there is no partial import.
//! Export writes the roster as indented JSON, by default to
//! `college_data.json`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::models::College;

/// Default export file name.
pub const EXPORT_FILE_NAME: &str = "college_data.json";

/// A roster file: one college or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Many(Vec<College>),
    One(Box<College>),
}

/// Read a roster file. Malformed JSON is an error and the caller's state
/// stays untouched.
pub fn import_roster(path: &Path) -> Result<Vec<College>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed: RosterFile = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let colleges = match parsed {
        RosterFile::Many(list) => list,
        RosterFile::One(college) => vec![*college],
    };
    info!(count = colleges.len(), path = %path.display(), "Imported roster");
    Ok(colleges)
}

/// Serialize the full roster to indented JSON at the given path.
pub fn export_roster(path: &Path, colleges: &[College]) -> Result<()> {
    let contents = serde_json::to_string_pretty(colleges)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(count = colleges.len(), path = %path.display(), "Exported roster");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sport, Staff};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("courtside-test-{}-{}", std::process::id(), name))
    }

    fn sample_roster() -> Vec<College> {
        let mut college = College::new();
        let mut sport = Sport::new();
        let mut staff = Staff::new();
        staff.first_name = "John".to_string();
        staff.last_name = "Smith".to_string();
        staff.name = "John Smith".to_string();
        staff.email = "john.smith@college.edu".to_string();
        staff.phone = "555-123-4567".to_string();
        sport.staff.push(staff);
        college.sports.push(sport);
        vec![college]
    }

    #[test]
    fn export_import_round_trip() {
        let path = temp_path("roundtrip.json");
        let roster = sample_roster();

        export_roster(&path, &roster).unwrap();
        let reread = import_roster(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            serde_json::to_value(&roster).unwrap(),
            serde_json::to_value(&reread).unwrap()
        );
    }

    #[test]
    fn import_accepts_single_object() {
        let path = temp_path("single.json");
        let college = College::new();
        std::fs::write(&path, serde_json::to_string_pretty(&college).unwrap()).unwrap();

        let roster = import_roster(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].college_id, college.college_id);
    }

    #[test]
    fn import_rejects_malformed_json() {
        let path = temp_path("malformed.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = import_roster(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn import_preserves_tri_state_flags() {
        let path = temp_path("flags.json");
        let mut roster = sample_roster();
        roster[0].sports[0].staff[0].active = crate::models::Flag::Unset;
        export_roster(&path, &roster).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"staffActive\": null"));

        let reread = import_roster(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reread[0].sports[0].staff[0].active, crate::models::Flag::Unset);
    }
}
