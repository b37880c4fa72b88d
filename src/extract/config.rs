use std::path::PathBuf;

use crate::settings::{Settings, DEFAULT_API_BASE_URL, DEFAULT_MODEL};

/// Read-only configuration handed to the extractor at construction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    template_path: Option<PathBuf>,
}

impl ExtractorConfig {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: if model.trim().is_empty() { DEFAULT_MODEL.to_string() } else { model },
            base_url: DEFAULT_API_BASE_URL.to_string(),
            template_path: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_key(), settings.model())
            .with_base_url(&settings.api_base_url)
            .with_template_path(settings.template_path())
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if !base_url.trim().is_empty() {
            self.base_url = base_url.to_string();
        }
        self
    }

    pub fn with_template_path(mut self, path: PathBuf) -> Self {
        self.template_path = Some(path);
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Contents of the prompt template, or `None` when there is no template
    /// or it cannot be read.
    pub fn load_template(&self) -> Option<String> {
        let path = self.template_path.as_ref()?;
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read prompt template: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_fall_back() {
        let config = ExtractorConfig::new(Some("  ".to_string()), "");
        assert!(config.api_key().is_none());
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_load_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        let config = ExtractorConfig::new(None, "m").with_template_path(path.clone());
        assert!(config.load_template().is_none());
        std::fs::write(&path, "custom").unwrap();
        assert_eq!(config.load_template().as_deref(), Some("custom"));
        assert!(ExtractorConfig::new(None, "m").load_template().is_none());
    }
}
