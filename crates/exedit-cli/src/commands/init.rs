//! The `exedit init` command.

use std::path::Path;

use anyhow::Result;

use exedit_core::config::SAMPLE_CONFIG;

const SAMPLE_LIBRARY: &str = include_str!("../../../../samples/library.json");

pub fn execute() -> Result<()> {
    write_once(Path::new("exedit.toml"), SAMPLE_CONFIG)?;
    write_once(Path::new("exercises.json"), SAMPLE_LIBRARY)?;

    println!("\nNext steps:");
    println!("  1. Run: exedit validate");
    println!("  2. Run: exedit list --sort-by level");
    println!("  3. Run: exedit new qcm");

    Ok(())
}

fn write_once(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}
