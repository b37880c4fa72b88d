use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPLATE_PATH: &str = "prompts/bill_extraction.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_model")]
    pub openai_model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Prompt template path; relative paths resolve against `data_dir`.
    #[serde(default = "default_template_path")]
    pub prompt_template: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_template_path() -> String {
    DEFAULT_TEMPLATE_PATH.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            openai_api_key: String::new(),
            openai_model: default_model(),
            api_base_url: default_api_base_url(),
            prompt_template: default_template_path(),
        }
    }
}

impl Settings {
    /// API key with `OPENAI_API_KEY` taking precedence over the stored value.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.openai_api_key.clone()).filter(|k| !k.trim().is_empty()))
    }

    pub fn model(&self) -> String {
        std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if self.openai_model.trim().is_empty() {
                    default_model()
                } else {
                    self.openai_model.clone()
                }
            })
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_path().join("billbook.db")
    }

    pub fn template_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.prompt_template);
        if path.is_absolute() {
            path
        } else {
            self.data_path().join(path)
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BILLBOOK_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("billbook")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("billbook")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {e}");
                Settings::default()
            }
        }
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    load_settings().data_path()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

/// Mask all but the last four characters of a credential for display.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "openai_api_key": "sk-abc"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.openai_model, DEFAULT_MODEL);
        assert_eq!(s.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(s.prompt_template, DEFAULT_TEMPLATE_PATH);
        assert_eq!(s.openai_api_key, "sk-abc");
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.openai_api_key.is_empty());
        assert_eq!(s.openai_model, "gpt-4o-mini");
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_template_path_resolves_against_data_dir() {
        let s = Settings {
            data_dir: "/tmp/books".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.template_path(), PathBuf::from("/tmp/books/prompts/bill_extraction.txt"));

        let s = Settings {
            prompt_template: "/etc/prompt.txt".to_string(),
            ..s
        };
        assert_eq!(s.template_path(), PathBuf::from("/etc/prompt.txt"));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let settings = Settings {
            data_dir: "/tmp/test".to_string(),
            openai_api_key: "sk-test".to_string(),
            openai_model: "gpt-4o".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.data_dir, "/tmp/test");
        assert_eq!(loaded.openai_model, "gpt-4o");
        assert_eq!(loaded.openai_api_key, "sk-test");
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdef1234"), "*********1234");
        assert_eq!(mask_key("abc"), "***");
        assert_eq!(mask_key(""), "");
    }
}
