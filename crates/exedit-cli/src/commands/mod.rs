//! Subcommands and the plumbing they share.

pub mod delete;
pub mod export;
pub mod grade;
pub mod import;
pub mod init;
pub mod list;
pub mod new;
pub mod stats;
pub mod status;
pub mod validate;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use exedit_core::config::{load_config_from, ExeditConfig};
use exedit_core::export::save_library;
use exedit_core::import::load_document;
use exedit_core::store::ExerciseStore;
use exedit_core::view::{Filters, Selector, ViewQuery};
use exedit_core::workspace::Workspace;

/// Options accepted by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub library: Option<PathBuf>,
}

/// Filter, search and sort flags shared by `list` and `export`.
#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Only this exercise type
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Only validated or pending exercises
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub level: Option<String>,

    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,

    /// concept_name, subject, level or exercise_number
    #[arg(long)]
    pub sort_by: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,
}

impl ViewArgs {
    /// Build a query, falling back to the configured sort order.
    pub fn to_query(&self, config: &ExeditConfig) -> Result<ViewQuery> {
        let filters = Filters {
            kind: selector(&self.kind)?,
            status: selector(&self.status)?,
            subject: self.subject.clone().map_or(Selector::All, Selector::Only),
            level: self.level.clone().map_or(Selector::All, Selector::Only),
        };
        let sort_by = match &self.sort_by {
            Some(key) => key.parse().map_err(anyhow::Error::msg)?,
            None => config.sort_by,
        };
        let direction = match &self.order {
            Some(order) => order.parse().map_err(anyhow::Error::msg)?,
            None => config.sort_order,
        };
        Ok(ViewQuery {
            filters,
            search: self.search.clone().unwrap_or_default(),
            sort_by,
            direction,
        })
    }
}

fn selector<T: FromStr<Err = String>>(value: &Option<String>) -> Result<Selector<T>> {
    value
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(anyhow::Error::msg)
}

/// The library file a command works on.
pub struct Library {
    pub path: PathBuf,
    pub config: ExeditConfig,
}

impl Library {
    pub fn resolve(opts: &GlobalOpts) -> Result<Self> {
        let config = load_config_from(opts.config.as_deref())?;
        let path = opts.library.clone().unwrap_or_else(|| config.library.clone());
        Ok(Self { path, config })
    }

    /// Load the library. A missing file is an empty library.
    pub fn load(&self) -> Result<ExerciseStore> {
        if !self.path.exists() {
            tracing::debug!("{} does not exist yet, starting empty", self.path.display());
            return Ok(ExerciseStore::new());
        }
        Ok(ExerciseStore::from_exercises(load_document(&self.path)?))
    }

    pub fn open_workspace(&self) -> Result<Workspace> {
        Ok(Workspace::new(self.load()?))
    }

    pub fn save(&self, store: &ExerciseStore) -> Result<()> {
        save_library(&self.path, store.exercises())
            .with_context(|| format!("failed to save library {}", self.path.display()))
    }

    pub fn export_dir(&self) -> &Path {
        &self.config.export_dir
    }
}

/// Print the workspace's latest notification, if any.
pub fn print_notification(workspace: &Workspace) {
    if let Some(n) = workspace.notification() {
        if n.is_error() {
            eprintln!("{}", n.message);
        } else {
            println!("{}", n.message);
        }
    }
}

/// Ask on stdin; anything but `y`/`yes` declines, as do EOF and read errors.
///
/// The prompt goes to stderr, which is unbuffered.
pub fn ask(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
