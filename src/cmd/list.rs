use zett_note::{Config, Error, NoteEngine};

pub fn run(config: &Config, notes: bool, json: bool) -> zett_note::Result<()> {
    let engine = NoteEngine::new(config);
    let entries = if notes {
        engine.notes().list()?
    } else {
        engine.drafts().list()?
    };

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| Error::InvalidInput(format!("cannot encode listing: {}", e)))?;
        println!("{}", out);
    } else if entries.is_empty() {
        println!("No {} found", if notes { "notes" } else { "drafts" });
    } else if notes {
        for entry in &entries {
            println!("{:>6}  {}", entry.id, entry.title);
        }
    } else {
        super::select::print_numbered(&entries);
    }
    Ok(())
}
