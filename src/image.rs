//! Image relocation and inlining
//!
//! An embed `((cat.png))` in note `12` refers to `cat.png` in the staging directory until
//! the first compilation moves it to `<images>/12-cat.png`. Later compilations find the
//! composite file already in place and skip the move.
//!
//! A missing staged file is only a warning. Reading the composite file afterwards is not:
//! if it is still absent the embed fails.

use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};

use crate::config::Layout;
use crate::error::{Error, Result};
use crate::util;

/// What [`relocate`] did with the staged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// Staged file moved into the image store
    Moved,
    /// Composite file already present; nothing moved
    AlreadyStored,
    /// Neither the composite nor the staged file exists
    StagedMissing,
}

/// Ensure `<images>/<noteId>-<imageName>` exists, moving it out of staging if needed
pub fn relocate(layout: &Layout, note_id: &str, image_name: &str) -> Result<Relocation> {
    let stored = layout.stored_image_path(note_id, image_name)?;
    if stored.exists() {
        debug!("image {} already stored", util::display_path(&stored));
        return Ok(Relocation::AlreadyStored);
    }

    let staged = layout.staged_image_path(image_name)?;
    match move_file(&staged, &stored) {
        Ok(()) => {
            info!(
                "moved image {} -> {}",
                util::display_path(&staged),
                util::display_path(&stored)
            );
            Ok(Relocation::Moved)
        }
        Err(Error::NotFound { .. }) => {
            warn!(
                "note {}: image {:?} not found in staging directory {}",
                note_id,
                image_name,
                util::display_path(&layout.staging)
            );
            Ok(Relocation::StagedMissing)
        }
        Err(e) => Err(e),
    }
}

/// Relocate the image if needed and return an inline `<img>` tag carrying its bytes
pub fn embed(layout: &Layout, note_id: &str, image_name: &str) -> Result<String> {
    relocate(layout, note_id, image_name)?;
    let stored = layout.stored_image_path(note_id, image_name)?;
    inline_tag(&stored)
}

/// `<img src="data:<mime>;base64,<bytes>" />` for the file at `path`
pub fn inline_tag(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::from_io("image", path, e))?;
    let mime = sniff_mime_type(&bytes);
    Ok(format!(
        "<img src=\"data:{};base64,{}\" />",
        mime,
        STANDARD.encode(&bytes)
    ))
}

/// Move `src` to `dst`, creating the destination directory; falls back to copy + remove
/// when a plain rename is impossible (e.g. across filesystems)
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Err(Error::NotFound {
            what: "staged image",
            path: src.to_path_buf(),
        });
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::from_io("image directory", parent, e))?;
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::from_io("staged image", src, e)),
        Err(rename_err) => {
            debug!("rename failed ({}), copying instead", rename_err);
            fs::copy(src, dst).map_err(|e| Error::Io {
                path: dst.to_path_buf(),
                source: e,
            })?;
            fs::remove_file(src).map_err(|e| Error::Io {
                path: src.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Guess a MIME type from the leading bytes of a file
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xFF\xD8\xFF", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"BM", "image/bmp"),
        (b"\x00\x00\x01\x00", "image/x-icon"),
        (b"%PDF-", "application/pdf"),
    ];

    for (magic, mime) in SIGNATURES {
        if bytes.starts_with(magic) {
            return *mime;
        }
    }

    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" && matches!(&bytes[8..12], b"avif" | b"avis") {
        return "image/avif";
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            let head_lower: String = text
                .trim_start()
                .chars()
                .take(512)
                .collect::<String>()
                .to_ascii_lowercase();
            if head_lower.starts_with("<svg")
                || (head_lower.starts_with("<?xml") && head_lower.contains("<svg"))
            {
                "image/svg+xml"
            } else if text.chars().any(|c| c.is_control() && !c.is_whitespace()) {
                "application/octet-stream"
            } else {
                "text/plain; charset=utf-8"
            }
        }
        Err(_) => "application/octet-stream",
    }
}
