//! `project.yaml` language declaration.
//!
//! Only the `language:` key is read. The file is treated as plain
//! `key: value` lines rather than YAML so that templated or partially
//! filled-in files still resolve.

use std::path::Path;

use crate::error::{io_err, CoreError};
use crate::types::Language;

/// File name of the project metadata file.
pub const METADATA_FILE: &str = "project.yaml";

/// Extract the raw `language:` value from metadata text. The last
/// declaration wins; lines must start with the key.
pub fn language_value(contents: &str) -> Option<String> {
    contents
        .lines()
        .filter_map(|line| line.strip_prefix("language:"))
        .last()
        .map(|value| value.trim().to_string())
}

/// Parse the language declaration from metadata text.
pub fn parse_language(contents: &str) -> Result<Language, CoreError> {
    match language_value(contents) {
        Some(value) if !value.is_empty() => value.parse(),
        _ => Err(CoreError::UnsupportedLanguage { value: None }),
    }
}

/// Read `<project_dir>/project.yaml` and resolve its language.
pub fn read_language(project_dir: &Path) -> Result<Language, CoreError> {
    let path = project_dir.join(METADATA_FILE);
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    parse_language(&contents)
}
