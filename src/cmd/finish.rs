use zett_note::{Config, NoteEngine};

pub fn run(config: &Config, json: bool) -> zett_note::Result<()> {
    let engine = NoteEngine::new(config);
    let drafts = engine.drafts();
    let Some(draft) = super::select::select_draft(drafts.list()?)? else {
        return Ok(());
    };

    let compiler = engine.compiler()?;
    let compiled = drafts.finish(&draft, &compiler)?;
    super::compile::print_compiled(&compiled, json)
}
