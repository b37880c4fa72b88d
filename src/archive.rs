use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use sha2::{Digest, Sha256};

use crate::error::{BillbookError, Result};

/// A bill document stored under the dated archive.
#[derive(Debug, Clone)]
pub struct ArchivedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
}

pub fn date_dir(base: &Path, date: NaiveDate) -> PathBuf {
    base.join(date.format("%Y-%m-%d").to_string())
}

/// Copy `source` into `<base>/<YYYY-MM-DD>/`, suffixing `_1`, `_2`, ... onto
/// the stem when the name is already taken. Returns the destination path.
pub fn archive_file(base: &Path, source: &Path, date: NaiveDate) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(BillbookError::Other(format!("File not found: {}", source.display())));
    }
    let dir = date_dir(base, date);
    std::fs::create_dir_all(&dir)?;

    let filename = source
        .file_name()
        .ok_or_else(|| BillbookError::Other(format!("Not a file path: {}", source.display())))?;
    let mut dest = dir.join(filename);

    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("bill");
    let ext = source.extension().and_then(|e| e.to_str());
    let mut counter = 1;
    while dest.exists() {
        let candidate = match ext {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        dest = dir.join(candidate);
        counter += 1;
    }

    std::fs::copy(source, &dest)?;
    tracing::info!(source = %source.display(), dest = %dest.display(), "archived bill");
    Ok(dest)
}

/// Files archived on `date`, newest first.
pub fn files_for_date(base: &Path, date: NaiveDate) -> Result<Vec<ArchivedFile>> {
    let dir = date_dir(base, date);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        files.push(ArchivedFile {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path(),
            size: meta.len(),
            modified: DateTime::<Local>::from(meta.modified()?),
        });
    }
    files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(files)
}

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
