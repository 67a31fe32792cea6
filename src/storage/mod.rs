//! Storage layer for allocation files.
//!
//! An allocation file is a single JSON object holding `prefaces`,
//! `total_pages` and `page_list`. It is read once at startup and rewritten in
//! full on every save, indented with four spaces so it stays easy to edit by
//! hand.

use crate::allocation;
use crate::models::BookConfig;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load and validate the allocation file at `path`.
pub fn load(path: &Path) -> Result<BookConfig> {
    if !path.is_file() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let config: BookConfig = serde_json::from_str(&content)?;
    config.validate()?;
    allocation::check(&config)
        .map_err(|e| Error::InvalidConfig(format!("page_list: {}", e)))?;
    tracing::info!(
        path = %path.display(),
        lectures = config.lectures(),
        total_pages = config.total_pages,
        "loaded allocation file"
    );
    Ok(config)
}

/// Write `config` to `path`, replacing any previous content.
pub fn save(path: &Path, config: &BookConfig) -> Result<()> {
    fs::write(path, to_json(config)?)?;
    tracing::info!(path = %path.display(), "saved allocation file");
    Ok(())
}

/// Serialize `config` the way it is written to disk.
pub fn to_json(config: &BookConfig) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidConfig(e.to_string()))
}

/// Fail when `path` already exists, so setup never overwrites a file.
pub fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::AlreadyExists(path.display().to_string()));
    }
    Ok(())
}
