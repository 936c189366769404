//! The `exedit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use exedit_core::import::{load_document, validate_exercises};

use super::{GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Library::resolve(opts)?.path,
    };
    let exercises = load_document(&path)?;
    println!("{}: {} exercise(s)", path.display(), exercises.len());

    let warnings = validate_exercises(&exercises);
    for w in &warnings {
        let prefix = w
            .exercise_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All exercises valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
