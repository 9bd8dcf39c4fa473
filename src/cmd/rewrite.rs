use zett_note::{Config, NoteEngine};

pub fn run(config: &Config, note_id: Option<String>, json: bool) -> zett_note::Result<()> {
    let id = super::select::note_id(note_id)?;
    let engine = NoteEngine::new(config);
    let path = engine.notes().path(&id)?;

    super::editor::open(&config.editor, &path)?;

    let compiled = engine.compiler()?.compile(&path)?;
    super::compile::print_compiled(&compiled, json)
}
