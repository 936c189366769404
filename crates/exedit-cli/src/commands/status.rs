//! The `exedit status` command.

use anyhow::{Context, Result};

use exedit_core::model::ValidationStatus;

use super::{print_notification, GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, id: String, status: String) -> Result<()> {
    let library = Library::resolve(opts)?;
    let mut workspace = library.open_workspace()?;

    let status = if status.eq_ignore_ascii_case("toggle") {
        workspace
            .store()
            .get(&id)
            .map(|e| e.validation_status.toggled())
            .with_context(|| format!("exercise not found: {id}"))?
    } else {
        status.parse::<ValidationStatus>().map_err(anyhow::Error::msg)?
    };

    workspace.set_status(&id, status)?;
    print_notification(&workspace);

    library.save(workspace.store())
}
