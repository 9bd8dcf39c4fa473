use zett_note::{util, CompiledNote, Config, Error, NoteEngine};

pub fn run(config: &Config, note_id: &str, json: bool) -> zett_note::Result<()> {
    let compiled = NoteEngine::new(config).compiler()?.compile_id(note_id)?;
    print_compiled(&compiled, json)
}

pub fn print_compiled(compiled: &CompiledNote, json: bool) -> zett_note::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(compiled)
            .map_err(|e| Error::InvalidInput(format!("cannot encode result: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", util::display_path(&compiled.html_path));
    for target in &compiled.backlinks_added {
        println!("  backlink added to {}", target);
    }
    Ok(())
}
