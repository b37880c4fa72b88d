//! Remote structured-output client for the OpenAI files and responses APIs.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use serde_json::{json, Value};

use super::config::ExtractorConfig;
use super::error::ExtractError;
use super::schema::SCHEMA_NAME;
use super::{DocumentKind, FileKind};

pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(600);
pub const MAX_OUTPUT_TOKENS: u32 = 4000;
const UPLOAD_PURPOSE: &str = "user_data";

/// Handle to a document already uploaded to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub id: String,
    pub kind: DocumentKind,
}

/// The two remote operations the extraction pipeline needs.
pub trait RemoteClient {
    /// Upload a local document and return a handle to reference it by.
    fn upload(&self, path: &Path) -> Result<FileHandle, ExtractError>;

    /// Ask the model about an uploaded document; returns the raw text reply.
    fn ask(&self, file: &FileHandle, prompt: &str, schema: Option<&Value>) -> Result<String, ExtractError>;
}

/// Blocking client for the OpenAI HTTP API.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        Ok(Self::with_http_client(config, Client::builder().build()?))
    }

    pub fn with_http_client(config: &ExtractorConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            model: config.model().to_string(),
        }
    }

    fn api_key(&self) -> Result<&str, ExtractError> {
        self.api_key.as_deref().ok_or(ExtractError::CredentialMissing)
    }

    fn check_status(response: Response) -> Result<Response, ExtractError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "remote service rejected request");
        Err(ExtractError::remote(status.as_u16(), body))
    }
}

impl RemoteClient for OpenAiClient {
    fn upload(&self, path: &Path) -> Result<FileHandle, ExtractError> {
        let key = self.api_key()?;
        let kind = match FileKind::from_path(path) {
            Some(FileKind::Document(kind)) => kind,
            _ => return Err(super::unsupported_type(path)),
        };

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let part = multipart::Part::file(path)?.mime_str(mime.as_ref())?;
        let form = multipart::Form::new()
            .text("purpose", UPLOAD_PURPOSE)
            .part("file", part);

        tracing::info!(file = %path.display(), "uploading document");
        let response = self
            .http
            .post(format!("{}/files", self.base_url))
            .bearer_auth(key)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()?;
        let body: Value = Self::check_status(response)?.json()?;

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractError::UnexpectedResponseShape("upload response has no id".to_string()))?;
        tracing::debug!(file_id = id, "upload complete");
        Ok(FileHandle {
            id: id.to_string(),
            kind,
        })
    }

    fn ask(&self, file: &FileHandle, prompt: &str, schema: Option<&Value>) -> Result<String, ExtractError> {
        let key = self.api_key()?;
        let body = generation_request(&self.model, file, prompt, schema);

        tracing::info!(model = %self.model, file_id = %file.id, "requesting structured extraction");
        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(key)
            .json(&body)
            .timeout(GENERATION_TIMEOUT)
            .send()?;
        let reply: Value = Self::check_status(response)?.json()?;
        output_text(&reply)
    }
}

/// JSON body for a structured generation call.
pub fn generation_request(model: &str, file: &FileHandle, prompt: &str, schema: Option<&Value>) -> Value {
    let attachment = match file.kind {
        DocumentKind::Pdf => json!({ "type": "input_file", "file_id": file.id }),
        DocumentKind::Image => json!({ "type": "input_image", "file_id": file.id }),
    };

    let mut body = json!({
        "model": model,
        "input": [{
            "role": "user",
            "content": [
                { "type": "input_text", "text": prompt },
                attachment
            ]
        }],
        "max_output_tokens": MAX_OUTPUT_TOKENS
    });
    if let Some(schema) = schema {
        body["text"] = json!({
            "format": {
                "type": "json_schema",
                "name": SCHEMA_NAME,
                "schema": schema,
                "strict": true
            }
        });
    }
    body
}

/// Pull the model's text out of a responses-API reply: the top-level
/// `output_text` if present, otherwise the first text content in `output`.
pub fn output_text(reply: &Value) -> Result<String, ExtractError> {
    if let Some(text) = reply.get("output_text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    let outputs = reply.get("output").and_then(Value::as_array);
    let text = outputs
        .into_iter()
        .flatten()
        .filter_map(|out| out.get("content").and_then(Value::as_array))
        .flatten()
        .find_map(|content| content.get("text").and_then(Value::as_str));

    match text {
        Some(text) => Ok(text.to_string()),
        None => {
            let refusal = outputs
                .into_iter()
                .flatten()
                .filter_map(|out| out.get("content").and_then(Value::as_array))
                .flatten()
                .find_map(|content| content.get("refusal").and_then(Value::as_str));
            Err(ExtractError::UnexpectedResponseShape(match refusal {
                Some(reason) => format!("model refused: {reason}"),
                None => "response contains no output text".to_string(),
            }))
        }
    }
}
