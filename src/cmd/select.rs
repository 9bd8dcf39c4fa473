//! Interactive draft and note selection

use std::io::{self, Write};

use zett_note::error::{Error, Result};
use zett_note::Entry;

/// Print drafts as a numbered list
pub fn print_numbered(entries: &[Entry]) {
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>3}  {}", i + 1, entry.title);
    }
}

/// Pick one draft: the only one, or the one whose number the user types
///
/// Returns `None` (after saying so) when there are no drafts.
pub fn select_draft(mut drafts: Vec<Entry>) -> Result<Option<Entry>> {
    match drafts.len() {
        0 => {
            println!("No drafts found");
            Ok(None)
        }
        1 => Ok(drafts.pop()),
        len => {
            print_numbered(&drafts);
            let answer = prompt(&format!("Select draft [1-{}]: ", len))?;
            let index = parse_choice(&answer, len)?;
            Ok(Some(drafts.swap_remove(index)))
        }
    }
}

/// 1-based choice to 0-based index
fn parse_choice(answer: &str, len: usize) -> Result<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(Error::InvalidInput(format!(
            "expected a number between 1 and {}, got {:?}",
            len,
            answer.trim()
        ))),
    }
}

/// Ask for a value on stdin
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    let mut input = String::new();
    io::stdout()
        .flush()
        .and_then(|_| io::stdin().read_line(&mut input))
        .map_err(|e| Error::InvalidInput(format!("cannot read answer: {}", e)))?;
    Ok(input.trim().to_string())
}

/// Note id from the command line, or asked for when absent
pub fn note_id(given: Option<String>) -> Result<String> {
    let id = match given {
        Some(id) => id,
        None => prompt("Note id: ")?,
    };
    if id.trim().is_empty() {
        return Err(Error::InvalidInput("no note id given".to_string()));
    }
    Ok(id.trim().to_string())
}
