//! The `exedit export` command.

use std::path::PathBuf;

use anyhow::Result;

use exedit_core::export::ExportScope;

use super::{print_notification, GlobalOpts, Library, ViewArgs};

pub fn execute(
    opts: &GlobalOpts,
    scope: String,
    out: Option<PathBuf>,
    select: Option<String>,
    view: ViewArgs,
) -> Result<()> {
    let scope: ExportScope = scope.parse().map_err(anyhow::Error::msg)?;
    let library = Library::resolve(opts)?;
    let mut workspace = library.open_workspace()?;
    *workspace.query_mut() = view.to_query(&library.config)?;

    if let Some(select) = select {
        for id in select.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !workspace.store().contains(id) {
                anyhow::bail!("exercise not found: {id}");
            }
            if !workspace.store().is_selected(id) {
                workspace.toggle_selection(id);
            }
        }
    }

    let today = chrono::Local::now().date_naive();
    let file = workspace.export(scope, today)?;
    let dir = out.unwrap_or_else(|| library.export_dir().to_path_buf());
    let path = file.save(&dir)?;
    print_notification(&workspace);
    println!("{}", path.display());
    Ok(())
}
