//! NoteEngine - draft and note collection operations
//!
//! Provides an object-oriented interface over the configured directories:
//! - Draft creation from a template, listing, deletion and promotion to a note
//! - Note listing and deletion
//! - The draft id counter in the metadata directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::compiler::{self, CompiledNote, Compiler};
use crate::config::{Config, Layout};
use crate::constants as C;
use crate::error::{Error, Result};
use crate::macros;
use crate::util;

// === NoteEngine ===

/// Core engine for draft and note operations
pub struct NoteEngine<'a> {
    config: &'a Config,
}

impl<'a> NoteEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Compiler over this engine's layout
    pub fn compiler(&self) -> Result<Compiler<'a>> {
        Compiler::new(&self.config.layout)
    }

    /// Draft id counter
    pub fn counter(&self) -> MetaCounter<'a> {
        MetaCounter {
            layout: &self.config.layout,
        }
    }

    /// Draft collection
    pub fn drafts(&self) -> Drafts<'a> {
        Drafts {
            config: self.config,
        }
    }

    /// Note collection
    pub fn notes(&self) -> Notes<'a> {
        Notes {
            layout: &self.config.layout,
        }
    }
}

// === MetaCounter ===

/// Persisted integer handing out draft ids
pub struct MetaCounter<'a> {
    layout: &'a Layout,
}

impl MetaCounter<'_> {
    pub fn file(&self) -> PathBuf {
        self.layout.counter_path()
    }

    /// Last id handed out; a missing counter file counts as 0
    pub fn current(&self) -> Result<u64> {
        let path = self.file();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::from_io("draft counter", &path, e)),
        };
        content.trim().parse().map_err(|_| Error::Malformed {
            path,
            reason: format!("expected a number, found {:?}", content.trim()),
        })
    }

    /// Increment the counter and return the new id
    pub fn next(&self) -> Result<u64> {
        let next = self.current()? + 1;
        let path = self.file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::from_io("metadata directory", parent, e))?;
        }
        fs::write(&path, next.to_string()).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(next)
    }
}

// === Drafts ===

/// A draft or note file with its title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    #[serde(skip)]
    pub path: PathBuf,
}

impl Entry {
    fn load(path: PathBuf) -> Result<Self> {
        let text = compiler::read_note(&path)?;
        Ok(Self {
            id: util::note_id_from_path(&path)?,
            title: util::extract_note_title(&path, &text),
            path,
        })
    }
}

/// Draft collection
pub struct Drafts<'a> {
    config: &'a Config,
}

impl Drafts<'_> {
    /// All drafts, numeric ids first in numeric order, then by name
    pub fn list(&self) -> Result<Vec<Entry>> {
        let mut entries = list_entries(&self.config.layout.drafts)?;
        entries.sort_by(|a, b| {
            let key = |e: &Entry| (e.id.parse::<u64>().map_err(|_| ()), e.id.clone());
            key(a).cmp(&key(b))
        });
        Ok(entries)
    }

    /// Template text for new drafts; the built-in template stands in for a missing file
    pub fn template(&self) -> Result<String> {
        let path = self
            .config
            .layout
            .templates
            .join(&self.config.draft_template);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no draft template at {}, using built-in", util::display_path(&path));
                Ok(C::FALLBACK_DRAFT_TEMPLATE.to_string())
            }
            Err(e) => Err(Error::from_io("draft template", &path, e)),
        }
    }

    /// Create a new draft from the template under the next counter id
    pub fn create(&self) -> Result<PathBuf> {
        let content = macros::expand(&self.template()?);
        let id = MetaCounter {
            layout: &self.config.layout,
        }
        .next()?;

        let path = self.config.layout.draft_path(&id.to_string())?;
        if path.exists() {
            return Err(Error::InvalidInput(format!(
                "draft {} already exists; check the counter in {}",
                id,
                util::display_path(&self.config.layout.counter_path())
            )));
        }
        fs::create_dir_all(&self.config.layout.drafts)
            .map_err(|e| Error::from_io("drafts directory", &self.config.layout.drafts, e))?;
        fs::write(&path, content).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;

        info!("created draft {}", util::display_path(&path));
        Ok(path)
    }

    pub fn delete(&self, draft: &Entry) -> Result<()> {
        fs::remove_file(&draft.path).map_err(|e| Error::from_io("draft", &draft.path, e))?;
        info!("deleted draft {}", draft.id);
        Ok(())
    }

    /// Compile the draft, then move it into the notes directory
    pub fn finish(&self, draft: &Entry, compiler: &Compiler<'_>) -> Result<CompiledNote> {
        let file_name = draft
            .path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| Error::InvalidInput(format!("not a file: {}", draft.path.display())))?;
        let dest = util::secure_join(&self.config.layout.notes, &file_name)?;
        if dest.exists() {
            return Err(Error::InvalidInput(format!(
                "note {} already exists",
                util::display_path(&dest)
            )));
        }

        let compiled = compiler.compile(&draft.path)?;

        fs::create_dir_all(&self.config.layout.notes)
            .map_err(|e| Error::from_io("notes directory", &self.config.layout.notes, e))?;
        fs::rename(&draft.path, &dest).map_err(|e| Error::Io {
            path: dest.clone(),
            source: e,
        })?;
        info!("finished draft {} -> {}", draft.id, util::display_path(&dest));

        Ok(compiled)
    }
}

// === Notes ===

/// Note collection
pub struct Notes<'a> {
    layout: &'a Layout,
}

impl Notes<'_> {
    pub fn list(&self) -> Result<Vec<Entry>> {
        list_entries(&self.layout.notes)
    }

    /// Path of an existing note
    pub fn path(&self, id: &str) -> Result<PathBuf> {
        let path = self.layout.note_path(id)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::NotFound { what: "note", path })
        }
    }

    /// Remove a note and its compiled artifact
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path(id)?;
        fs::remove_file(&path).map_err(|e| Error::from_io("note", &path, e))?;

        let html = self.layout.html_path(id)?;
        match fs::remove_file(&html) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("note {} had no compiled artifact", id);
            }
            Err(e) => return Err(Error::from_io("compiled note", &html, e)),
        }

        info!("deleted note {}", id);
        Ok(())
    }
}

fn list_entries(dir: &Path) -> Result<Vec<Entry>> {
    compiler::note_files(dir)?
        .into_iter()
        .map(Entry::load)
        .collect()
}
