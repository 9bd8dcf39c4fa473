use zett_note::{Config, NoteEngine};

pub fn run(config: &Config) -> zett_note::Result<()> {
    let drafts = NoteEngine::new(config).drafts().list()?;
    match super::select::select_draft(drafts)? {
        Some(draft) => super::editor::open(&config.editor, &draft.path),
        None => Ok(()),
    }
}
