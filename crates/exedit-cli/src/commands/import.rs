//! The `exedit import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{print_notification, GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, file: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read import file {}", file.display()))?;
    let library = Library::resolve(opts)?;
    let mut workspace = library.open_workspace()?;

    workspace
        .import_json(&content)
        .with_context(|| format!("failed to import {}", file.display()))?;
    print_notification(&workspace);

    library.save(workspace.store())
}
