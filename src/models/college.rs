//! College and sport records.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::staff::Staff;

/// Accept either a JSON string or number for fields older exports carry
/// as bare numbers (NCAA division).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    /// Sport name ("Women's Soccer", ...). The wire key is just `sport`.
    #[serde(rename = "sport")]
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub division: String,
    #[serde(default)]
    pub conference: String,
    #[serde(rename = "governingBody", default)]
    pub governing_body: String,
    #[serde(rename = "sportCoachDirectoryLink", default)]
    pub coach_directory_link: String,
    #[serde(default)]
    pub staff: Vec<Staff>,
}

impl Sport {
    pub fn new() -> Self {
        Self {
            name: "New Sport".to_string(),
            division: "1".to_string(),
            conference: String::new(),
            governing_body: "NCAA".to_string(),
            coach_directory_link: String::new(),
            staff: Vec::new(),
        }
    }

    /// Display name for warning reports; unnamed sports still need a label.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed Sport"
        } else {
            &self.name
        }
    }
}

impl Default for Sport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    #[serde(rename = "collegeId")]
    pub college_id: Uuid,
    #[serde(rename = "officialName")]
    pub official_name: String,
    /// Derived: lowercase of officialName, recomputed on every name edit.
    #[serde(rename = "officialNameLowercase")]
    pub official_name_lowercase: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
    #[serde(rename = "divisionNCAA", deserialize_with = "string_or_number")]
    pub division_ncaa: String,
    #[serde(rename = "orgIdNCAA", default)]
    pub org_id_ncaa: Option<i64>,
    #[serde(rename = "academicYearNCAA")]
    pub academic_year_ncaa: i64,
    #[serde(rename = "activeNCAA", default)]
    pub active_ncaa: bool,
    #[serde(rename = "stateProvinceNCAA", default)]
    pub state_province: String,
    #[serde(rename = "collegeWebsiteUrl", default)]
    pub college_website_url: String,
    #[serde(rename = "athleticWebsiteUrl", default)]
    pub athletic_website_url: String,
    #[serde(rename = "sportDirectoryLink", default)]
    pub sport_directory_link: String,
    #[serde(rename = "nicheCollegeLink", default)]
    pub niche_college_link: String,
    #[serde(rename = "governmentSchoolLink", default)]
    pub government_school_link: String,
    #[serde(rename = "ipedsId", default)]
    pub ipeds_id: String,
    #[serde(default)]
    pub sports: Vec<Sport>,
}

impl College {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            college_id: Uuid::new_v4(),
            official_name: "New College".to_string(),
            official_name_lowercase: "new college".to_string(),
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
            division_ncaa: "1".to_string(),
            org_id_ncaa: None,
            academic_year_ncaa: (now.year() + 1) as i64,
            active_ncaa: true,
            state_province: String::new(),
            college_website_url: String::new(),
            athletic_website_url: String::new(),
            sport_directory_link: String::new(),
            niche_college_link: String::new(),
            government_school_link: String::new(),
            ipeds_id: String::new(),
            sports: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}

impl Default for College {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable college header fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollegeField {
    Name,
    State,
    Division,
    CollegeWebsite,
    AthleticWebsite,
}

impl CollegeField {
    pub const ALL: [CollegeField; 5] = [
        CollegeField::Name,
        CollegeField::State,
        CollegeField::Division,
        CollegeField::CollegeWebsite,
        CollegeField::AthleticWebsite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CollegeField::Name => "College Name",
            CollegeField::State => "State",
            CollegeField::Division => "NCAA Division",
            CollegeField::CollegeWebsite => "College Website",
            CollegeField::AthleticWebsite => "Athletic Website",
        }
    }
}

/// Editable sport header fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportField {
    Name,
    Division,
    Conference,
    CoachDirectoryLink,
}

impl SportField {
    pub const ALL: [SportField; 4] = [
        SportField::Name,
        SportField::Division,
        SportField::Conference,
        SportField::CoachDirectoryLink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SportField::Name => "Sport",
            SportField::Division => "Division",
            SportField::Conference => "Conference",
            SportField::CoachDirectoryLink => "Coach Directory URL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_accepts_number_or_string() {
        let from_num: Sport =
            serde_json::from_str(r#"{"sport":"Soccer","division":1,"staff":[]}"#).unwrap();
        assert_eq!(from_num.division, "1");

        let from_str: Sport =
            serde_json::from_str(r#"{"sport":"Soccer","division":"III","staff":[]}"#).unwrap();
        assert_eq!(from_str.division, "III");
    }

    #[test]
    fn new_college_defaults() {
        let college = College::new();
        assert_eq!(college.official_name, "New College");
        assert_eq!(college.official_name_lowercase, "new college");
        assert!(college.active_ncaa);
        assert!(college.sports.is_empty());
    }

    #[test]
    fn unnamed_sport_display_name() {
        let mut sport = Sport::new();
        sport.name.clear();
        assert_eq!(sport.display_name(), "Unnamed Sport");
    }
}
