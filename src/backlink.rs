//! Backlink maintenance
//!
//! When note A references note B, B gets a list item `- [[A's title|A]]` unless it already
//! references A or carries the `<!-- nobacklink -->` marker. B is re-rendered right after
//! the line is appended so its compiled artifact shows the new link.
//!
//! A reference to a note that does not exist is let through: the source note still
//! compiles and the dangling link is only logged. The same holds for a source whose id
//! cannot be written as a tag that scans back to that id (e.g. a file name containing `|`
//! or surrounding whitespace); appending such a line would never be recognised later.

use std::fs;

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::compiler::{read_note, Compiler};
use crate::error::{Error, Result};
use crate::markup;
use crate::util;

static NO_BACKLINK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*nobacklink\s*-->").unwrap());

/// What [`Compiler::ensure_backlink`] found or did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backlink {
    /// A backlink line was appended and the target re-rendered
    Inserted,
    /// Target already references the source
    AlreadyPresent,
    /// Target carries the suppression marker
    Suppressed,
    /// Target note does not exist
    TargetMissing,
    /// Source id does not survive a round trip through a reference tag
    Unlinkable,
}

/// Whether note text opts out of receiving backlinks
pub fn has_no_backlink_marker(text: &str) -> bool {
    NO_BACKLINK_MARKER.is_match(text)
}

/// The list item appended to a target note
pub fn backlink_line(source_title: &str, source_id: &str) -> String {
    // Brackets would make the inserted tag unparseable and defeat the presence check
    let title: String = source_title.chars().filter(|c| *c != '[' && *c != ']').collect();
    format!("- {}", markup::reference_tag(title.trim(), source_id))
}

/// Whether `line` scans back to exactly one reference pointing at `id`
fn links_back_to(line: &str, id: &str) -> bool {
    let mut refs = markup::references(line);
    matches!((refs.next(), refs.next()), (Some(r), None) if r.id == id)
}

/// Append `line` on its own line, keeping the text newline-terminated
pub fn append_line(content: &str, line: &str) -> String {
    let separator = if content.is_empty() || content.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    format!("{}{}{}\n", content, separator, line)
}

impl Compiler<'_> {
    /// Make note `target_id` reference note `source_id`
    ///
    /// Calling this again with the same arguments finds the inserted line and leaves the
    /// target untouched.
    pub fn ensure_backlink(
        &self,
        source_id: &str,
        source_title: &str,
        target_id: &str,
    ) -> Result<Backlink> {
        let line = backlink_line(source_title, source_id);
        if !links_back_to(&line, source_id) {
            warn!(
                "note id {:?} cannot be written as a reference; no backlink added to {}",
                source_id, target_id
            );
            return Ok(Backlink::Unlinkable);
        }

        let target_path = self.layout.note_path(target_id)?;

        let text = match read_note(&target_path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                warn!("note {} references missing note {}", source_id, target_id);
                return Ok(Backlink::TargetMissing);
            }
            Err(e) => return Err(e),
        };

        if markup::references_id(&text, source_id) {
            return Ok(Backlink::AlreadyPresent);
        }
        if has_no_backlink_marker(&text) {
            return Ok(Backlink::Suppressed);
        }

        let updated = append_line(&text, &line);
        fs::write(&target_path, &updated).map_err(|e| Error::Io {
            path: target_path.clone(),
            source: e,
        })?;
        info!("added backlink {} -> {}", target_id, source_id);

        let target_title = util::extract_note_title(&target_path, &updated);
        self.render_note(target_id, &target_title, &updated)?;

        Ok(Backlink::Inserted)
    }
}
