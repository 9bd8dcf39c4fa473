//! Constants for zett-note
//!
//! Directory names, file names, markup delimiters and format strings shared
//! by the compiler and the draft/note commands.

// === Directory Layout Defaults ===

/// Default base directory under the user's home
pub const DEFAULT_BASE_DIR: &str = ".zett";

/// Default notes directory (relative to base)
pub const DEFAULT_NOTE_DIR: &str = "notes";

/// Default permanent image store (relative to base)
pub const DEFAULT_IMG_DIR: &str = "notes/imgs";

/// Default image staging directory (relative to base)
pub const DEFAULT_IMGTMP_DIR: &str = "imgtmp";

/// Default drafts directory (relative to base)
pub const DEFAULT_DRAFT_DIR: &str = "drafts";

/// Default templates directory (relative to base)
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Default metadata directory (relative to base)
pub const DEFAULT_META_DIR: &str = "config";

/// Default compiled HTML directory (relative to base)
pub const DEFAULT_HTML_DIR: &str = "html";

/// Default draft template file name (inside the templates directory)
pub const DEFAULT_DRAFT_TEMPLATE: &str = "draftTemplate.md";

/// Optional configuration file inside the base directory
pub const CONFIG_FILENAME: &str = "zett.yaml";

/// Default editor when neither --editor nor $EDITOR is set
pub const DEFAULT_EDITOR: &str = "vim";

// === Metadata Files ===

/// Draft id counter (inside the metadata directory)
pub const COUNT_FILENAME: &str = "count";

/// Stylesheet prepended to every compiled note (inside the metadata directory)
pub const STYLE_FILENAME: &str = "style.css";

/// Template used when the draft template file is missing
pub const FALLBACK_DRAFT_TEMPLATE: &str = "# @timestamp\n\n";

// === Note Files ===

/// Extension tried when a note id has no bare file
pub const MARKDOWN_EXTENSION: &str = "md";

/// Extension of compiled artifacts
pub const HTML_EXTENSION: &str = "html";

/// Prefix of the synthesized title for notes without a heading: Untitled ({filename})
pub const UNTITLED_PREFIX: &str = "Untitled";

// === Inline Markup ===

/// Opening delimiter of a reference tag: [[title|id]]
pub const REFERENCE_OPEN: &str = "[[";

/// Closing delimiter of a reference tag
pub const REFERENCE_CLOSE: &str = "]]";

/// Separator between title and id in a reference tag
pub const REFERENCE_SEPARATOR: char = '|';

/// Opening delimiter of an image embed: ((name))
pub const IMAGE_OPEN: &str = "((";

/// Closing delimiter of an image embed
pub const IMAGE_CLOSE: &str = "))";

/// Canonical spelling of the backlink suppression marker
pub const NO_BACKLINK_MARKER: &str = "<!-- nobacklink -->";

// === Macros ===

/// Macro expanding to the current local date
pub const MACRO_TIMESTAMP: &str = "@timestamp";

/// Date format used by the @timestamp macro: %Y-%m-%d
pub const MACRO_TIMESTAMP_FORMAT: &str = "%Y-%m-%d";

// === Environment ===

/// Environment variable overriding the base directory
pub const ENV_HOME: &str = "ZETT_HOME";

/// Environment variable naming the editor
pub const ENV_EDITOR: &str = "EDITOR";

/// Environment variable read by env_logger
pub const ENV_LOG: &str = "RUST_LOG";
