//! Utility functions for path handling and note identity

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants as C;
use crate::error::{Error, Result};

/// A line opening with a single `#` marker: the note title
static TITLE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[[:space:]]*#[[:space:]]+(\S.*)$").unwrap());

/// Join a single file name onto `base`, refusing anything that could leave it
///
/// Note ids and image names come straight from note text, so `[[x|../../etc/passwd]]`
/// must not resolve outside the notes directory.
pub fn secure_join(base: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidInput(format!("invalid file name: {:?}", name)));
    }
    if name.contains(|c: char| c == '/' || c == '\\') {
        return Err(Error::InvalidInput(format!(
            "path separators are not allowed in {:?}",
            name
        )));
    }
    // Windows drive prefix such as C:
    if name.len() >= 2 && name.as_bytes()[1] == b':' {
        return Err(Error::InvalidInput(format!("absolute paths are not allowed: {:?}", name)));
    }

    let result = base.join(name);

    // Symlinked entries must still land inside the base
    if result.exists() && base.exists() {
        let canonical_base = dunce::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
        let canonical_result = dunce::canonicalize(&result).unwrap_or_else(|_| result.clone());
        if !canonical_result.starts_with(&canonical_base) {
            return Err(Error::InvalidInput(format!(
                "{:?} resolves outside {}",
                name,
                display_path(base)
            )));
        }
    }

    Ok(result)
}

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match home {
        Some(home) if path == "~" => home,
        Some(home) if path.starts_with("~/") || path.starts_with("~\\") => home.join(&path[2..]),
        _ => PathBuf::from(path),
    }
}

/// Derive the note id from a file name (extension stripped)
pub fn note_id_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidInput(format!("cannot derive a note id from {}", display_path(path)))
        })
}

/// Extract the title from note content: first `# ` heading line, else a placeholder
pub fn extract_note_title(note_path: &Path, content: &str) -> String {
    for line in content.lines() {
        if let Some(caps) = TITLE_LINE.captures(line) {
            return caps[1].trim_end().to_string();
        }
    }

    let filename = note_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{} ({})", C::UNTITLED_PREFIX, filename)
}

/// Convert heading text to an anchor id
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_is_dash = false;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            result.push(c);
            prev_is_dash = false;
        } else if !prev_is_dash && !result.is_empty() {
            result.push('-');
            prev_is_dash = true;
        }
    }

    result.trim_matches('-').to_string()
}

/// Display a path with forward slashes (cross-platform standard)
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
