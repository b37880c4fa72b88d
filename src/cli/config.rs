use crate::error::{BillbookError, Result};
use crate::extract::prompt::default_template;
use crate::settings::{load_settings, mask_key, save_settings};

pub fn show() -> Result<()> {
    let settings = load_settings();
    let key = settings
        .api_key()
        .map(|k| mask_key(&k))
        .unwrap_or_else(|| "(not set)".to_string());
    let template = settings.template_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("API key:    {key}");
    println!("Model:      {}", settings.model());
    println!("Base URL:   {}", settings.api_base_url);
    println!(
        "Prompt:     {}{}",
        template.display(),
        if template.exists() { "" } else { " (built-in default in use)" }
    );
    Ok(())
}

pub fn set_key(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(BillbookError::Settings("API key cannot be empty".to_string()));
    }
    let mut settings = load_settings();
    settings.openai_api_key = key.to_string();
    save_settings(&settings)?;
    println!("API key saved ({})", mask_key(key));
    Ok(())
}

pub fn set_model(model: &str) -> Result<()> {
    let mut settings = load_settings();
    settings.openai_model = model.trim().to_string();
    save_settings(&settings)?;
    println!("Model set to {}", settings.model());
    Ok(())
}

pub fn set_base_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(BillbookError::Settings(format!("Not an http(s) URL: {url}")));
    }
    let mut settings = load_settings();
    settings.api_base_url = url.to_string();
    save_settings(&settings)?;
    println!("Base URL set to {url}");
    Ok(())
}

pub fn init_prompt(force: bool) -> Result<()> {
    let path = load_settings().template_path();
    if path.exists() && !force {
        return Err(BillbookError::Other(format!(
            "Template already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, format!("{}\n", default_template()))?;
    println!("Wrote prompt template to {}", path.display());
    Ok(())
}
