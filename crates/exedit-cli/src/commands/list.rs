//! The `exedit list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use exedit_core::view::visible;

use super::{GlobalOpts, Library, ViewArgs};

pub fn execute(opts: &GlobalOpts, view: ViewArgs) -> Result<()> {
    let library = Library::resolve(opts)?;
    let query = view.to_query(&library.config)?;
    let store = library.load()?;
    let rows = visible(store.exercises(), &query);

    if rows.is_empty() {
        println!("No exercises match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Type", "Concept", "#", "Subject", "Level", "Status"]);
    for e in &rows {
        table.add_row(vec![
            Cell::new(&e.id),
            Cell::new(e.kind()),
            Cell::new(&e.concept_name),
            Cell::new(e.exercise_number),
            Cell::new(&e.subject),
            Cell::new(&e.level),
            Cell::new(e.validation_status),
        ]);
    }

    println!("{table}");
    println!("{} of {} exercise(s)", rows.len(), store.len());
    Ok(())
}
