//! The `exedit new` command.

use anyhow::Result;

use exedit_core::model::ExerciseType;

use super::{print_notification, GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, kind: String) -> Result<()> {
    let kind: ExerciseType = kind.parse().map_err(anyhow::Error::msg)?;
    let library = Library::resolve(opts)?;
    let mut workspace = library.open_workspace()?;

    let id = workspace.create(kind)?;
    print_notification(&workspace);
    println!("{id}");

    library.save(workspace.store())
}
