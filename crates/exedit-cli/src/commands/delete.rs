//! The `exedit delete` command.

use anyhow::Result;

use exedit_core::error::StoreError;
use exedit_core::traits::{AssumeYes, Confirm};

use super::{ask, print_notification, GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, ids: Vec<String>, yes: bool) -> Result<()> {
    let library = Library::resolve(opts)?;
    let mut workspace = library.open_workspace()?;

    let mut assume_yes = AssumeYes;
    let mut prompt = |question: &str| ask(question);
    let confirm: &mut dyn Confirm = if yes { &mut assume_yes } else { &mut prompt };

    let result = match ids.as_slice() {
        [id] => workspace.delete(id, confirm).map(|_| ()),
        _ => {
            if let Some(missing) = ids.iter().find(|id| !workspace.store().contains(id)) {
                return Err(StoreError::NotFound(missing.clone()).into());
            }
            for id in &ids {
                if !workspace.store().is_selected(id) {
                    workspace.toggle_selection(id);
                }
            }
            workspace.delete_selected(confirm).map(|_| ())
        }
    };

    match result {
        Err(StoreError::Cancelled) => {
            println!("Deletion cancelled.");
            Ok(())
        }
        Err(e) => Err(e.into()),
        Ok(()) => {
            print_notification(&workspace);
            library.save(workspace.store())
        }
    }
}
