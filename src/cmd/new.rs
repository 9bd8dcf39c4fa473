use zett_note::{util, Config, NoteEngine};

pub fn run(config: &Config) -> zett_note::Result<()> {
    let path = NoteEngine::new(config).drafts().create()?;
    println!("{}", util::display_path(&path));
    super::editor::open(&config.editor, &path)
}
