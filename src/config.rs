//! Directory layout and settings resolution
//!
//! Every directory is resolved in this order:
//! 1. command-line flag
//! 2. `zett.yaml` in the base directory
//! 3. built-in default relative to the base directory
//!
//! The base directory itself comes from `--basedir`, then `ZETT_HOME`, then `~/.zett`.
//! The editor comes from `--editor`, then `EDITOR`, then `zett.yaml`, then `vim`.
//! Relative paths are taken relative to the base directory and a leading `~` expands to
//! the home directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::constants as C;
use crate::error::{Error, Result};
use crate::util;

/// Directories the compiler and the draft commands operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Permanent notes
    pub notes: PathBuf,
    /// Drafts in progress
    pub drafts: PathBuf,
    /// Compiled HTML artifacts
    pub html: PathBuf,
    /// Permanent image store
    pub images: PathBuf,
    /// Image staging area
    pub staging: PathBuf,
    /// Metadata: draft counter and stylesheet
    pub meta: PathBuf,
    /// Draft templates
    pub templates: PathBuf,
}

impl Layout {
    /// Default layout rooted at `base`
    pub fn under(base: &Path) -> Self {
        Self {
            notes: base.join(C::DEFAULT_NOTE_DIR),
            drafts: base.join(C::DEFAULT_DRAFT_DIR),
            html: base.join(C::DEFAULT_HTML_DIR),
            images: base.join(C::DEFAULT_IMG_DIR),
            staging: base.join(C::DEFAULT_IMGTMP_DIR),
            meta: base.join(C::DEFAULT_META_DIR),
            templates: base.join(C::DEFAULT_TEMPLATE_DIR),
        }
    }

    /// Path of the note named `id`: `<notes>/<id>`, or `<notes>/<id>.md` when only that exists
    pub fn note_path(&self, id: &str) -> Result<PathBuf> {
        let bare = util::secure_join(&self.notes, id)?;
        if bare.exists() {
            return Ok(bare);
        }
        let with_ext = util::secure_join(&self.notes, &format!("{}.{}", id, C::MARKDOWN_EXTENSION))?;
        if with_ext.exists() {
            return Ok(with_ext);
        }
        Ok(bare)
    }

    /// Path of a draft file
    pub fn draft_path(&self, name: &str) -> Result<PathBuf> {
        util::secure_join(&self.drafts, name)
    }

    /// Compiled artifact of note `id`: `<html>/<id>.html`
    pub fn html_path(&self, id: &str) -> Result<PathBuf> {
        util::secure_join(&self.html, &format!("{}.{}", id, C::HTML_EXTENSION))
    }

    /// Permanent location of an image embedded by `note_id`: `<images>/<noteId>-<imageName>`
    pub fn stored_image_path(&self, note_id: &str, image_name: &str) -> Result<PathBuf> {
        util::secure_join(&self.images, &composite_image_name(note_id, image_name))
    }

    /// Staged location of an image waiting to be relocated
    pub fn staged_image_path(&self, image_name: &str) -> Result<PathBuf> {
        util::secure_join(&self.staging, image_name)
    }

    /// Draft id counter
    pub fn counter_path(&self) -> PathBuf {
        self.meta.join(C::COUNT_FILENAME)
    }
}

/// `<noteId>-<imageName>`
pub fn composite_image_name(note_id: &str, image_name: &str) -> String {
    format!("{}-{}", note_id, image_name)
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub basedir: Option<String>,
    pub editor: Option<String>,
    pub notedir: Option<String>,
    pub imgdir: Option<String>,
    pub draftdir: Option<String>,
    pub templatedir: Option<String>,
    pub configdir: Option<String>,
    pub imgtmp: Option<String>,
    pub htmldir: Option<String>,
    pub drafttemplate: Option<String>,
}

/// Contents of `zett.yaml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub editor: Option<String>,
    pub notedir: Option<String>,
    pub imgdir: Option<String>,
    pub draftdir: Option<String>,
    pub templatedir: Option<String>,
    pub configdir: Option<String>,
    pub imgtmp: Option<String>,
    pub htmldir: Option<String>,
    pub drafttemplate: Option<String>,
}

impl FileConfig {
    /// Load `path`; a missing file yields the empty configuration
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::from_io("config file", path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| Error::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Fully resolved settings, passed by reference to the engine and compiler
#[derive(Debug, Clone)]
pub struct Config {
    pub base: PathBuf,
    pub layout: Layout,
    pub editor: String,
    /// File name of the draft template inside `layout.templates`
    pub draft_template: String,
}

impl Config {
    /// Default configuration rooted at `base`
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            layout: Layout::under(&base),
            base,
            editor: C::DEFAULT_EDITOR.to_string(),
            draft_template: C::DEFAULT_DRAFT_TEMPLATE.to_string(),
        }
    }

    /// Resolve settings from command-line overrides, environment and `zett.yaml`
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let base = match &overrides.basedir {
            Some(dir) => util::expand_tilde(dir),
            None => default_base_dir()?,
        };
        let file = FileConfig::load(&base.join(C::CONFIG_FILENAME))?;
        let config = Self::from_parts(base, overrides, &file, env_non_empty(C::ENV_EDITOR));
        debug!("resolved configuration: {:?}", config);
        Ok(config)
    }

    fn from_parts(
        base: PathBuf,
        overrides: &Overrides,
        file: &FileConfig,
        env_editor: Option<String>,
    ) -> Self {
        let dir = |flag: &Option<String>, from_file: &Option<String>, default: &str| {
            let raw = flag.as_deref().or(from_file.as_deref()).unwrap_or(default);
            let path = util::expand_tilde(raw);
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };

        let layout = Layout {
            notes: dir(&overrides.notedir, &file.notedir, C::DEFAULT_NOTE_DIR),
            drafts: dir(&overrides.draftdir, &file.draftdir, C::DEFAULT_DRAFT_DIR),
            html: dir(&overrides.htmldir, &file.htmldir, C::DEFAULT_HTML_DIR),
            images: dir(&overrides.imgdir, &file.imgdir, C::DEFAULT_IMG_DIR),
            staging: dir(&overrides.imgtmp, &file.imgtmp, C::DEFAULT_IMGTMP_DIR),
            meta: dir(&overrides.configdir, &file.configdir, C::DEFAULT_META_DIR),
            templates: dir(&overrides.templatedir, &file.templatedir, C::DEFAULT_TEMPLATE_DIR),
        };

        let editor = overrides
            .editor
            .clone()
            .or(env_editor)
            .or_else(|| file.editor.clone())
            .unwrap_or_else(|| C::DEFAULT_EDITOR.to_string());

        let draft_template = overrides
            .drafttemplate
            .clone()
            .or_else(|| file.drafttemplate.clone())
            .unwrap_or_else(|| C::DEFAULT_DRAFT_TEMPLATE.to_string());

        Self {
            base,
            layout,
            editor,
            draft_template,
        }
    }

    /// Create every configured directory that does not exist yet
    pub fn ensure_dirs(&self) -> Result<()> {
        let l = &self.layout;
        for dir in [&l.notes, &l.drafts, &l.html, &l.images, &l.staging, &l.meta, &l.templates] {
            fs::create_dir_all(dir).map_err(|e| Error::from_io("directory", dir, e))?;
        }
        Ok(())
    }
}

fn default_base_dir() -> Result<PathBuf> {
    if let Some(home) = env_non_empty(C::ENV_HOME) {
        return Ok(util::expand_tilde(&home));
    }
    dirs::home_dir()
        .map(|home| home.join(C::DEFAULT_BASE_DIR))
        .ok_or_else(|| {
            Error::InvalidInput("cannot determine home directory; pass --basedir".to_string())
        })
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let layout = Layout::under(Path::new("/z"));
        assert_eq!(layout.notes, PathBuf::from("/z/notes"));
        assert_eq!(layout.images, PathBuf::from("/z/notes/imgs"));
        assert_eq!(layout.staging, PathBuf::from("/z/imgtmp"));
        assert_eq!(layout.html, PathBuf::from("/z/html"));
        assert_eq!(layout.counter_path(), PathBuf::from("/z/config/count"));
    }

    #[test]
    fn test_flag_beats_file_beats_default() {
        let overrides = Overrides {
            notedir: Some("flag-notes".to_string()),
            ..Default::default()
        };
        let file = FileConfig {
            notedir: Some("file-notes".to_string()),
            htmldir: Some("/abs/html".to_string()),
            editor: Some("nano".to_string()),
            ..Default::default()
        };
        let config = Config::from_parts(PathBuf::from("/z"), &overrides, &file, None);
        assert_eq!(config.layout.notes, PathBuf::from("/z/flag-notes"));
        assert_eq!(config.layout.html, PathBuf::from("/abs/html"));
        assert_eq!(config.layout.drafts, PathBuf::from("/z/drafts"));
        assert_eq!(config.editor, "nano");

        let config = Config::from_parts(
            PathBuf::from("/z"),
            &overrides,
            &file,
            Some("emacs".to_string()),
        );
        assert_eq!(config.editor, "emacs");
    }

    #[test]
    fn test_file_config_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(C::CONFIG_FILENAME);

        assert_eq!(FileConfig::load(&path).unwrap(), FileConfig::default());

        fs::write(&path, "htmldir: site\ndrafttemplate: t.md\n").unwrap();
        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.htmldir.as_deref(), Some("site"));
        assert_eq!(file.drafttemplate.as_deref(), Some("t.md"));

        fs::write(&path, "bogus_key: 1\n").unwrap();
        assert!(matches!(FileConfig::load(&path), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_note_path_prefers_bare_name() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::under(temp_dir.path());
        fs::create_dir_all(&layout.notes).unwrap();

        assert_eq!(layout.note_path("7").unwrap(), layout.notes.join("7"));

        fs::write(layout.notes.join("7.md"), "# Seven").unwrap();
        assert_eq!(layout.note_path("7").unwrap(), layout.notes.join("7.md"));

        fs::write(layout.notes.join("7"), "# Seven").unwrap();
        assert_eq!(layout.note_path("7").unwrap(), layout.notes.join("7"));
    }

    #[test]
    fn test_image_paths() {
        let layout = Layout::under(Path::new("/z"));
        assert_eq!(
            layout.stored_image_path("12", "cat.png").unwrap(),
            PathBuf::from("/z/notes/imgs/12-cat.png")
        );
        assert!(layout.staged_image_path("../cat.png").is_err());
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_base(temp_dir.path());
        config.ensure_dirs().unwrap();
        assert!(config.layout.notes.is_dir());
        assert!(config.layout.images.is_dir());
        assert!(config.layout.staging.is_dir());
    }
}
