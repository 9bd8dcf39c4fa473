use zett_note::{Config, NoteEngine};

pub fn run(config: &Config, note_id: Option<String>) -> zett_note::Result<()> {
    let id = super::select::note_id(note_id)?;
    NoteEngine::new(config).notes().delete(&id)?;
    println!("Deleted note: {}", id);
    Ok(())
}
