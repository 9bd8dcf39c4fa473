use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// zett - A Zettelkasten note compiler
///
/// # Quick Reference
///
/// ## Drafts
///
/// ```bash
/// zett new                      # Create a draft from the template and open the editor
/// zett list                     # List drafts with their index
/// zett edit                     # Pick a draft and open it in the editor
/// zett finish                   # Compile a draft and move it into notes/
/// zett deld                     # Pick a draft and delete it
/// ```
///
/// ## Notes
///
/// ```bash
/// zett list --notes             # List permanent notes
/// zett rewrite 12               # Edit note 12, then recompile it
/// zett compile 12               # Recompile note 12 without the editor
/// zett deln 12                  # Delete note 12 and its HTML
/// zett recompile                # Recompile every note
/// ```
///
/// ## Markup
///
/// - `[[Title|12]]` links to note 12 and gives note 12 a backlink
/// - `((cat.png))` embeds imgtmp/cat.png, moved to notes/imgs/12-cat.png on first compile
/// - `<!-- nobacklink -->` in a note stops it from receiving backlinks
///
/// ## Configuration
///
/// Directories come from flags, then `<basedir>/zett.yaml`, then the defaults below.
///
/// - `ZETT_HOME`: base directory (default: ~/.zett)
/// - `EDITOR`: editor command (default: vim)
/// - `RUST_LOG`: log filter (overrides -v)
///
/// ## Scripting/JSON Mode
///
/// ```bash
/// zett --json list              # [{"id":"3","title":"Draft"}]
/// zett --json compile 12        # {"id":"12","title":...,"html_path":...,"backlinks_added":[]}
/// ```
///
#[derive(Parser, Debug)]
#[command(name = "zett")]
#[command(version)]
#[command(about = "A Zettelkasten note compiler")]
pub struct Cli {
    /// Base directory (default: ~/.zett or $ZETT_HOME)
    #[arg(long, global = true, value_name = "PATH")]
    pub basedir: Option<String>,

    /// Editor command (default: $EDITOR or vim)
    #[arg(long, global = true, value_name = "CMD")]
    pub editor: Option<String>,

    /// Notes directory (default: notes)
    #[arg(long, global = true, value_name = "PATH")]
    pub notedir: Option<String>,

    /// Image store (default: notes/imgs)
    #[arg(long, global = true, value_name = "PATH")]
    pub imgdir: Option<String>,

    /// Drafts directory (default: drafts)
    #[arg(long, global = true, value_name = "PATH")]
    pub draftdir: Option<String>,

    /// Template directory (default: templates)
    #[arg(long, global = true, value_name = "PATH")]
    pub templatedir: Option<String>,

    /// Metadata directory holding the counter and style.css (default: config)
    #[arg(long, global = true, value_name = "PATH")]
    pub configdir: Option<String>,

    /// Image staging directory (default: imgtmp)
    #[arg(long, global = true, value_name = "PATH")]
    pub imgtmp: Option<String>,

    /// Compiled HTML directory (default: html)
    #[arg(long, global = true, value_name = "PATH")]
    pub htmldir: Option<String>,

    /// Draft template file name inside the template directory (default: draftTemplate.md)
    #[arg(long, global = true, value_name = "FILE")]
    pub drafttemplate: Option<String>,

    /// Output in JSON format (for scripting)
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Command-line values for configuration resolution
    pub fn overrides(&self) -> Overrides {
        Overrides {
            basedir: self.basedir.clone(),
            editor: self.editor.clone(),
            notedir: self.notedir.clone(),
            imgdir: self.imgdir.clone(),
            draftdir: self.draftdir.clone(),
            templatedir: self.templatedir.clone(),
            configdir: self.configdir.clone(),
            imgtmp: self.imgtmp.clone(),
            htmldir: self.htmldir.clone(),
            drafttemplate: self.drafttemplate.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new draft and open it in the editor
    #[command(alias = "n")]
    New,

    /// Edit a draft
    #[command(alias = "e")]
    Edit,

    /// List drafts (or notes)
    #[command(aliases = ["l", "ls"])]
    List {
        /// List permanent notes instead of drafts
        #[arg(long)]
        notes: bool,
    },

    /// Delete a draft
    #[command(name = "deld", alias = "dd")]
    DeleteDraft,

    /// Delete a note and its compiled HTML
    #[command(name = "deln", alias = "dn")]
    DeleteNote {
        /// Note id (prompted for when omitted)
        note_id: Option<String>,
    },

    /// Compile a draft and move it into the notes directory
    #[command(alias = "f")]
    Finish,

    /// Edit a note, then recompile it
    #[command(alias = "r")]
    Rewrite {
        /// Note id (prompted for when omitted)
        note_id: Option<String>,
    },

    /// Compile one note
    #[command(alias = "c")]
    Compile {
        /// Note id
        note_id: String,
    },

    /// Recompile every note
    Recompile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["zett", "compile", "12", "--basedir", "/tmp/z", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.overrides().basedir.as_deref(), Some("/tmp/z"));
        assert!(matches!(cli.command, Command::Compile { ref note_id } if note_id == "12"));
    }

    #[test]
    fn test_parse_aliases() {
        assert!(matches!(Cli::parse_from(["zett", "dd"]).command, Command::DeleteDraft));
        assert!(matches!(
            Cli::parse_from(["zett", "dn"]).command,
            Command::DeleteNote { note_id: None }
        ));
        assert!(matches!(
            Cli::parse_from(["zett", "ls", "--notes"]).command,
            Command::List { notes: true }
        ));
        assert!(matches!(Cli::parse_from(["zett", "f"]).command, Command::Finish));
    }
}
