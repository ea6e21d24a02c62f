use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TagError};

pub const NOTE_EXTENSION: &str = "md";

/// Rejects names that would escape the repo directory.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TagError::InvalidArgument("note name must not be empty".into()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(TagError::InvalidArgument(format!(
            "note name must not contain path separators: {}",
            name
        )));
    }
    Ok(())
}

pub fn note_path(repo_dir: &Path, name: &str) -> PathBuf {
    repo_dir.join(format!("{}.{}", name, NOTE_EXTENSION))
}

/// Initial body for a new note: an empty fenced block labelled with the text
/// after the last `.` of the name.
pub fn seed_content(name: &str) -> String {
    let language = name.rsplit('.').next().unwrap_or(name);
    format!("```{}\n\n```", language)
}

/// Creates the note with its seed body unless it already exists.
pub fn create_note(repo_dir: &Path, name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    fs::create_dir_all(repo_dir)?;
    let path = note_path(repo_dir, name);
    if !path.exists() {
        fs::write(&path, seed_content(name))?;
    }
    Ok(path)
}

/// Path string under which a note is registered in the store.
pub fn store_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Concatenates matched files for the pager, marking paths that have gone
/// missing from disk instead of failing.
pub fn render_matches(paths: &[String]) -> String {
    let mut out = String::new();
    for path in paths {
        let body = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => "File not found on disk.".to_string(),
        };
        out.push_str(&format!("=== {} ===\n\n{}\n\n", path, body));
    }
    out
}
