//! Client for the generative-text extraction endpoint.
//!
//! Wraps pasted free text in a fixed instruction prompt, posts it to the
//! Gemini `generateContent` API, and parses the generated text back into
//! structured staff fields. The call has no retry and no timeout; a
//! stalled request resolves only when reqwest itself gives up.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ExtractError;

/// Base URL for the generative-text API.
const GENERATE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Staff fields as the model is asked to emit them. Every field is
/// optional; the prompt says "use null" for anything missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedStaff {
    #[serde(rename = "staffTitle")]
    pub title: Option<String>,
    #[serde(rename = "staffFirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "staffMiddleName")]
    pub middle_name: Option<String>,
    #[serde(rename = "staffLastName")]
    pub last_name: Option<String>,
    #[serde(rename = "staffEmail")]
    pub email: Option<String>,
    #[serde(rename = "staffPhoneNumber")]
    pub phone: Option<String>,
}

/// Result of one extraction call: the first staff object found, how many
/// further objects the model returned, and the raw generated text for the
/// response panel.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub staff: ExtractedStaff,
    pub extra_count: usize,
    pub raw_text: String,
}

/// Client for the extraction endpoint.
/// Clone is cheap - reqwest::Client shares its connection pool via Arc.
#[derive(Clone)]
pub struct ExtractClient {
    client: Client,
    api_key: String,
    model: String,
}

impl ExtractClient {
    /// Create a new client. Deliberately no request timeout - the UI
    /// shows "processing" until the call resolves either way.
    pub fn new(api_key: String, model: String) -> Result<Self, ExtractError> {
        if api_key.is_empty() {
            return Err(ExtractError::MissingApiKey);
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Send pasted text through the instruction prompt and parse the
    /// reply into staff fields.
    pub async fn extract_staff(&self, pasted: &str) -> Result<Extraction, ExtractError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GENERATE_BASE_URL, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(pasted),
                }],
            }],
        };

        debug!(model = %self.model, chars = pasted.len(), "Sending extraction request");
        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ExtractError::from_status(status, &text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::InvalidResponse(e.to_string()))?;

        let generated = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ExtractError::InvalidResponse("Empty candidate list".to_string()))?;

        let (staff, extra_count) = parse_generated(&generated)?;
        Ok(Extraction {
            staff,
            extra_count,
            raw_text: generated,
        })
    }
}

/// The fixed instruction template wrapped around the pasted text.
fn build_prompt(pasted: &str) -> String {
    format!(
        r#"You are a helpful assistant that extracts staff information from a given text. The user will provide a block of text containing staff names, roles, emails, and phone numbers. Your task is to extract this information and format it as a JSON array of objects. Each object should have the properties 'staffTitle', 'staffFirstName', 'staffMiddleName', 'staffLastName', 'staffEmail', 'staffPhoneNumber'. The 'staffPhoneNumber' should be formatted as "(123) 456-7890". If a piece of information is not present, use null.

Parse the following text and extract staff information into a JSON array with these exact fields:
[
{{
  "staffTitle": "extracted title or null",
  "staffFirstName": "extracted first name or null",
  "staffMiddleName": "extracted middle name or null",
  "staffLastName": "extracted last name or null",
  "staffEmail": "extracted email or null",
  "staffPhoneNumber": "extracted phone number formatted as (123) 456-7890 or null"
}}
]

Text to parse: {pasted}

Return only the JSON array, no other text."#
    )
}

/// Pull the first JSON array (or bare object) out of generated text.
/// Models frequently wrap the payload in prose or code fences, so this is
/// a bracket scan rather than a strict parse of the whole reply.
fn first_json(text: &str) -> Option<&str> {
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            return Some(&text[start..=end]);
        }
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return Some(&text[start..=end]);
        }
    }
    None
}

/// Parse generated text into the first staff object plus a count of any
/// additional objects the model returned.
pub fn parse_generated(text: &str) -> Result<(ExtractedStaff, usize), ExtractError> {
    let json = first_json(text).ok_or(ExtractError::NoJsonFound)?;

    if let Ok(list) = serde_json::from_str::<Vec<ExtractedStaff>>(json) {
        let extra = list.len().saturating_sub(1);
        let first = list.into_iter().next().ok_or(ExtractError::NoJsonFound)?;
        return Ok((first, extra));
    }

    let single: ExtractedStaff = serde_json::from_str(json)
        .map_err(|e| ExtractError::InvalidResponse(format!("Unparsable staff JSON: {}", e)))?;
    Ok((single, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_in_code_fence() {
        let text = r#"Here you go:
```json
[{"staffTitle": "Head Coach", "staffFirstName": "John", "staffLastName": "Smith", "staffEmail": "john@college.edu", "staffPhoneNumber": "(555) 123-4567", "staffMiddleName": null}]
```"#;
        let (staff, extra) = parse_generated(text).unwrap();
        assert_eq!(staff.title.as_deref(), Some("Head Coach"));
        assert_eq!(staff.first_name.as_deref(), Some("John"));
        assert_eq!(staff.middle_name, None);
        assert_eq!(extra, 0);
    }

    #[test]
    fn counts_additional_objects() {
        let text = r#"[{"staffFirstName": "A"}, {"staffFirstName": "B"}, {"staffFirstName": "C"}]"#;
        let (staff, extra) = parse_generated(text).unwrap();
        assert_eq!(staff.first_name.as_deref(), Some("A"));
        assert_eq!(extra, 2);
    }

    #[test]
    fn accepts_bare_object() {
        let text = r#"{"staffFirstName": "Jane", "staffLastName": "Doe"}"#;
        let (staff, extra) = parse_generated(text).unwrap();
        assert_eq!(staff.last_name.as_deref(), Some("Doe"));
        assert_eq!(extra, 0);
    }

    #[test]
    fn rejects_text_without_json() {
        let err = parse_generated("Sorry, I could not find any staff.").unwrap_err();
        assert!(matches!(err, ExtractError::NoJsonFound));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let text = r#"[{"staffFirstName": "A", "confidence": 0.9}]"#;
        let (staff, _) = parse_generated(text).unwrap();
        assert_eq!(staff.first_name.as_deref(), Some("A"));
    }

    #[test]
    fn prompt_embeds_pasted_text() {
        let prompt = build_prompt("Jane Doe, Assistant Coach");
        assert!(prompt.contains("Text to parse: Jane Doe, Assistant Coach"));
        assert!(prompt.contains("staffPhoneNumber"));
    }
}
