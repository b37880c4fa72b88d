//! Bill extraction: turn a PDF, image or text document into a [`Bill`].
//!
//! Text files are wrapped locally. PDFs and images are uploaded to the
//! remote model, which answers under a strict JSON schema built from the
//! caller's category list; the reply is then normalized into a `Bill`.
//! [`BillExtractor::extract`] is the one place where pipeline errors are
//! logged and turned into user-facing text.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod schema;

use std::path::Path;

pub use client::{FileHandle, OpenAiClient, RemoteClient};
pub use config::ExtractorConfig;
pub use error::ExtractError;

use crate::fmt::truncate_chars;
use crate::models::{Bill, LineItem};

/// Longest text-file content carried into a synthetic line item.
pub const TEXT_CONTENT_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

/// What an input file is, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Document(DocumentKind),
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_of(path).as_str() {
            ".txt" => Some(Self::Text),
            ".pdf" => Some(Self::Document(DocumentKind::Pdf)),
            ".jpg" | ".jpeg" | ".png" | ".gif" | ".bmp" | ".tiff" => {
                Some(Self::Document(DocumentKind::Image))
            }
            _ => None,
        }
    }
}

/// Lower-cased extension including the dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Error for a path whose extension is not handled, naming the file when it
/// has no extension at all.
pub(crate) fn unsupported_type(path: &Path) -> ExtractError {
    let ext = extension_of(path);
    if ext.is_empty() {
        ExtractError::UnsupportedFileType(format!("{} (no extension)", base_name(path)))
    } else {
        ExtractError::UnsupportedFileType(ext)
    }
}

pub fn can_extract(path: &Path) -> bool {
    FileKind::from_path(path).is_some()
}

/// Result of one extraction as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Extracted(Bill),
    Failed(String),
}

impl ExtractOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    /// Pretty-printed bill JSON on success, the error message otherwise.
    pub fn payload(&self) -> String {
        match self {
            Self::Extracted(bill) => serde_json::to_string_pretty(bill)
                .unwrap_or_else(|e| format!("Error serializing bill: {e}")),
            Self::Failed(message) => message.clone(),
        }
    }

    pub fn into_pair(self) -> (bool, String) {
        (self.success(), self.payload())
    }
}

pub struct BillExtractor<C: RemoteClient = OpenAiClient> {
    config: ExtractorConfig,
    client: C,
}

impl BillExtractor<OpenAiClient> {
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = OpenAiClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: RemoteClient> BillExtractor<C> {
    pub fn with_client(config: ExtractorConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Extract `path`, converting any failure into a logged message.
    pub fn extract(&self, path: &Path, categories: &[String]) -> ExtractOutcome {
        match self.extract_bill(path, categories) {
            Ok(bill) => {
                tracing::info!(file = %path.display(), items = bill.items.len(), "bill extracted");
                ExtractOutcome::Extracted(bill)
            }
            Err(err) => {
                tracing::error!(file = %path.display(), "bill extraction failed: {err}");
                ExtractOutcome::Failed(err.user_message())
            }
        }
    }

    pub fn extract_bill(&self, path: &Path, categories: &[String]) -> Result<Bill, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }
        match FileKind::from_path(path) {
            Some(FileKind::Text) => extract_text(path, categories),
            Some(FileKind::Document(_)) => self.extract_document(path, categories),
            None => Err(unsupported_type(path)),
        }
    }

    fn extract_document(&self, path: &Path, categories: &[String]) -> Result<Bill, ExtractError> {
        let filename = base_name(path);

        let handle = self
            .client
            .upload(path)
            .inspect_err(|e| tracing::warn!(file = %filename, stage = "upload", "{e}"))?;

        let template = self.config.load_template();
        let prompt = prompt::build_prompt(categories, template.as_deref());
        let schema = schema::build_schema(categories);

        let raw = self
            .client
            .ask(&handle, &prompt, Some(&schema))
            .inspect_err(|e| tracing::warn!(file = %filename, stage = "generate", "{e}"))?;
        tracing::debug!(file = %filename, raw = %truncate_chars(&raw, error::DIAGNOSTIC_LIMIT), "model output");

        normalize::normalize(&raw, &filename)
            .inspect_err(|e| tracing::warn!(file = %filename, stage = "normalize", "{e}"))
    }
}

/// Wrap a text file's content as a single zero-priced line item.
fn extract_text(path: &Path, categories: &[String]) -> Result<Bill, ExtractError> {
    let bytes = std::fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(file = %path.display(), "not UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    };

    let filename = base_name(path);
    let content = text.trim();
    let description = if content.is_empty() {
        filename.clone()
    } else {
        truncate_chars(content, TEXT_CONTENT_LIMIT)
    };

    Ok(Bill {
        bill_number: None,
        items: vec![LineItem {
            description,
            quantity: None,
            unit_price: None,
            price: 0.0,
            category: categories.first().cloned(),
        }],
        source_filename: filename,
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
