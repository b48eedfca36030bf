use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No API key configured - set GEMINI_API_KEY or add it to the config file")]
    MissingApiKey,

    #[error("Unauthorized - check the API key")]
    Unauthorized,

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No JSON object found in the generated text")]
    NoJsonFound,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ExtractError {
    /// Truncate a response body to avoid surfacing excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 | 403 => ExtractError::Unauthorized,
            429 => ExtractError::RateLimited,
            500..=599 => ExtractError::ServerError(truncated),
            _ => ExtractError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}
