//! The `exedit stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use exedit_core::stats::CollectionStats;

use super::{GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let store = Library::resolve(opts)?.load()?;
    let stats = CollectionStats::compute(store.exercises());

    println!(
        "Total: {}  Validated: {}  Pending: {}  ({:.1}% validated)",
        stats.total,
        stats.validated,
        stats.pending,
        stats.validated_ratio() * 100.0
    );

    let mut table = Table::new();
    table.set_header(vec!["Type", "Label", "Count"]);
    for (kind, count) in &stats.by_type {
        let label = if kind.is_legacy() {
            format!("{} (legacy)", kind.label())
        } else {
            kind.label().to_string()
        };
        table.add_row(vec![Cell::new(kind), Cell::new(label), Cell::new(count)]);
    }
    println!("{table}");
    Ok(())
}
