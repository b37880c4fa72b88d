use std::path::PathBuf;

use thiserror::Error;

use crate::fmt::truncate_chars;

/// Cap on raw model output carried into errors and logs.
pub const DIAGNOSTIC_LIMIT: usize = 2000;

/// Failures of the extraction pipeline, one variant per failure kind.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("OpenAI API key is not configured")]
    CredentialMissing,

    #[error("Remote service returned HTTP {status}: {body}")]
    RemoteService { status: u16, body: String },

    #[error("Could not parse model output as JSON: {raw}")]
    MalformedResponse { raw: String },

    #[error("Unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteService {
            status,
            body: truncate_chars(&body.into(), DIAGNOSTIC_LIMIT),
        }
    }

    pub fn malformed(raw: &str) -> Self {
        Self::MalformedResponse {
            raw: truncate_chars(raw, DIAGNOSTIC_LIMIT),
        }
    }

    /// Short text suitable for showing to the person who triggered the import.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound(_) => "File not found".to_string(),
            Self::UnsupportedFileType(ext) => format!("Unsupported file type: {ext}"),
            Self::CredentialMissing => {
                "OpenAI API key not configured. Run `billbook config set-key <KEY>` or set OPENAI_API_KEY."
                    .to_string()
            }
            Self::RemoteService { status: 401, .. } => {
                "Invalid OpenAI API key. Please check your configuration.".to_string()
            }
            Self::RemoteService { status: 429, .. } => {
                "OpenAI rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            Self::RemoteService { status, body } => {
                format!("OpenAI API error ({status}): {}", truncate_chars(body, 200))
            }
            Self::MalformedResponse { .. } => {
                "The model returned output that could not be parsed as JSON.".to_string()
            }
            Self::UnexpectedResponseShape(detail) => {
                format!("The model response had an unexpected shape: {detail}")
            }
            Self::Transport(e) if e.is_timeout() => {
                "The request to OpenAI timed out. Please try again.".to_string()
            }
            Self::Transport(e) => format!("Could not reach OpenAI: {e}"),
            Self::Io(e) => format!("Error reading file: {e}"),
        }
    }
}
