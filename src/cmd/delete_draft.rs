use zett_note::{Config, NoteEngine};

pub fn run(config: &Config) -> zett_note::Result<()> {
    let drafts = NoteEngine::new(config).drafts();
    if let Some(draft) = super::select::select_draft(drafts.list()?)? {
        drafts.delete(&draft)?;
        println!("Deleted draft: {}", draft.title);
    }
    Ok(())
}
