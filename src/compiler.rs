//! Reference compiler
//!
//! Compiling a note:
//! 1. read its text, derive id (file stem) and title (first `# ` line)
//! 2. make every referenced note link back to it (see [`Compiler::ensure_backlink`])
//! 3. rewrite `[[title|id]]` as `[title](id.html)` and `((name))` as an inline image
//! 4. render the result to `<html>/<id>.html`
//!
//! A single compilation stops at the first hard error. Backlinks already written to other
//! notes by then stay written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::backlink::Backlink;
use crate::config::Layout;
use crate::error::{Error, Result};
use crate::image;
use crate::markup::{self, Token};
use crate::render::Renderer;
use crate::util;

/// Result of compiling one note
#[derive(Debug, Clone, Serialize)]
pub struct CompiledNote {
    pub id: String,
    pub title: String,
    pub html_path: PathBuf,
    /// Ids of notes that received a new backlink
    pub backlinks_added: Vec<String>,
}

/// Outcome of [`Compiler::recompile_all`]
#[derive(Debug, Default)]
pub struct RecompileReport {
    pub compiled: Vec<CompiledNote>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl RecompileReport {
    pub fn total(&self) -> usize {
        self.compiled.len() + self.failures.len()
    }

    /// Turn collected failures into [`Error::Aggregate`]
    pub fn into_result(self) -> Result<Vec<CompiledNote>> {
        if self.failures.is_empty() {
            Ok(self.compiled)
        } else {
            Err(Error::Aggregate {
                total: self.compiled.len() + self.failures.len(),
                failures: self.failures,
            })
        }
    }
}

/// Compiles notes of one layout to HTML
pub struct Compiler<'a> {
    pub(crate) layout: &'a Layout,
    pub(crate) renderer: Renderer,
}

impl<'a> Compiler<'a> {
    /// Create a compiler, picking up the stylesheet from the metadata directory
    pub fn new(layout: &'a Layout) -> Result<Self> {
        let renderer = Renderer::load(&layout.meta)?;
        Ok(Self { layout, renderer })
    }

    pub fn with_renderer(layout: &'a Layout, renderer: Renderer) -> Self {
        Self { layout, renderer }
    }

    /// Compile the note stored at `note_path`
    pub fn compile(&self, note_path: &Path) -> Result<CompiledNote> {
        let text = read_note(note_path)?;
        let id = util::note_id_from_path(note_path)?;
        let title = util::extract_note_title(note_path, &text);
        debug!("compiling note {} ({:?})", id, title);

        let mut backlinks_added = Vec::new();
        for reference in markup::references(&text) {
            if self.ensure_backlink(&id, &title, reference.id)? == Backlink::Inserted
                && !backlinks_added.iter().any(|t| t == reference.id)
            {
                backlinks_added.push(reference.id.to_string());
            }
        }

        let html_path = self.render_note(&id, &title, &text)?;
        info!("compiled {} -> {}", id, util::display_path(&html_path));

        Ok(CompiledNote {
            id,
            title,
            html_path,
            backlinks_added,
        })
    }

    /// Compile the note with id `id` from the notes directory
    pub fn compile_id(&self, id: &str) -> Result<CompiledNote> {
        let path = self.layout.note_path(id)?;
        if !path.is_file() {
            return Err(Error::NotFound { what: "note", path });
        }
        self.compile(&path)
    }

    /// Compile every note in the notes directory, collecting per-note failures
    pub fn recompile_all(&self) -> Result<RecompileReport> {
        let mut report = RecompileReport::default();

        for path in note_files(&self.layout.notes)? {
            match self.compile(&path) {
                Ok(note) => report.compiled.push(note),
                Err(e) => {
                    warn!("failed to compile {}: {}", util::display_path(&path), e);
                    report.failures.push((path, e));
                }
            }
        }

        Ok(report)
    }

    /// Rewrite note text into renderable Markdown
    ///
    /// Reference tags become links to `<id>.html` and image embeds become inline
    /// `<img>` tags (relocating staged images on the way). Malformed tags stay verbatim.
    pub fn rewrite(&self, note_id: &str, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for token in markup::tokenize(text) {
            match token {
                Token::Literal(s) => out.push_str(s),
                Token::Reference(reference) => out.push_str(&markup::markdown_link(&reference)),
                Token::Image(embed) => {
                    out.push_str(&image::embed(self.layout, note_id, embed.name)?);
                }
            }
        }
        Ok(out)
    }

    /// Rewrite and render `text` to the compiled artifact of `note_id`
    pub(crate) fn render_note(&self, note_id: &str, title: &str, text: &str) -> Result<PathBuf> {
        let markdown = self.rewrite(note_id, text)?;
        let dest = self.layout.html_path(note_id)?;
        self.renderer.render_to_file(&markdown, title, &dest)?;
        Ok(dest)
    }
}

/// Read a note as UTF-8 text
pub fn read_note(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::from_io("note", path, e))
}

/// Regular, non-hidden files directly inside `notes_dir`, sorted by name
///
/// Subdirectories (such as an image store nested in the notes directory) and compiled
/// `.html` files are skipped. A missing directory holds no notes.
pub fn note_files(notes_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(notes_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::from_io("notes directory", notes_dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::from_io("notes directory", notes_dir, e))?;
        let path = entry.path();
        if !path.is_file() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == crate::constants::HTML_EXTENSION) {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Layout) {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::under(temp_dir.path());
        fs::create_dir_all(&layout.notes).unwrap();
        fs::create_dir_all(&layout.staging).unwrap();
        (temp_dir, layout)
    }

    fn write_note(layout: &Layout, id: &str, text: &str) -> PathBuf {
        let path = layout.notes.join(id);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_compile_renders_reference_as_link() {
        let (_temp_dir, layout) = setup();
        let compiler = Compiler::with_renderer(&layout, Renderer::default());
        write_note(&layout, "42", "# Answer\n");
        let path = write_note(&layout, "1", "# One\n\nSee [[Title|42]].\n");

        let compiled = compiler.compile(&path).unwrap();
        assert_eq!(compiled.id, "1");
        assert_eq!(compiled.title, "One");
        assert_eq!(compiled.html_path, layout.html.join("1.html"));
        assert_eq!(compiled.backlinks_added, vec!["42".to_string()]);

        let html = fs::read_to_string(&compiled.html_path).unwrap();
        assert!(html.contains(r#"<a href="42.html">Title</a>"#));
        assert!(html.contains("<title>One</title>"));
    }

    #[test]
    fn test_rewrite_leaves_malformed_tags() {
        let (_temp_dir, layout) = setup();
        let compiler = Compiler::with_renderer(&layout, Renderer::default());
        let out = compiler.rewrite("1", "[[no id]] (()) [[a|b|7]]").unwrap();
        assert_eq!(out, "[[no id]] (()) [a|b](7.html)");
    }

    #[test]
    fn test_compile_missing_note_is_not_found() {
        let (_temp_dir, layout) = setup();
        let compiler = Compiler::with_renderer(&layout, Renderer::default());
        assert!(compiler.compile(&layout.notes.join("nope")).unwrap_err().is_not_found());
        assert!(compiler.compile_id("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_compile_non_utf8_note_is_malformed() {
        let (_temp_dir, layout) = setup();
        let compiler = Compiler::with_renderer(&layout, Renderer::default());
        let path = layout.notes.join("bad");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(compiler.compile(&path), Err(Error::Malformed { .. })));
        assert!(!layout.html.join("bad.html").exists());
    }

    #[test]
    fn test_missing_image_leaves_no_artifact() {
        let (_temp_dir, layout) = setup();
        let compiler = Compiler::with_renderer(&layout, Renderer::default());
        let path = write_note(&layout, "5", "# Five\n((missing.png))\n");
        assert!(compiler.compile(&path).unwrap_err().is_not_found());
        assert!(!layout.html.join("5.html").exists());
    }

    #[test]
    fn test_note_files_skips_dirs_hidden_and_html() {
        let (_temp_dir, layout) = setup();
        write_note(&layout, "2", "# Two");
        write_note(&layout, "1", "# One");
        write_note(&layout, ".swp", "");
        write_note(&layout, "1.html", "");
        fs::create_dir_all(layout.notes.join("imgs")).unwrap();

        let files = note_files(&layout.notes).unwrap();
        assert_eq!(files, vec![layout.notes.join("1"), layout.notes.join("2")]);
        assert!(note_files(&layout.notes.join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_recompile_report_into_result() {
        let report = RecompileReport::default();
        assert!(report.into_result().unwrap().is_empty());

        let report = RecompileReport {
            compiled: Vec::new(),
            failures: vec![(PathBuf::from("x"), Error::InvalidInput("bad".to_string()))],
        };
        assert_eq!(report.total(), 1);
        assert!(matches!(report.into_result(), Err(Error::Aggregate { total: 1, .. })));
    }
}
