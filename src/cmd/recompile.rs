use serde_json::json;
use zett_note::{util, Config, NoteEngine};

pub fn run(config: &Config, json: bool) -> zett_note::Result<()> {
    let report = NoteEngine::new(config).compiler()?.recompile_all()?;

    if json {
        let failed: Vec<_> = report
            .failures
            .iter()
            .map(|(path, e)| json!({ "path": util::display_path(path), "error": e.to_string() }))
            .collect();
        println!(
            "{}",
            json!({ "compiled": report.compiled, "failed": failed })
        );
    } else {
        println!("Compiled {} of {} notes", report.compiled.len(), report.total());
    }

    report.into_result().map(|_| ())
}
