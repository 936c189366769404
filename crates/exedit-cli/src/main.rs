//! exedit CLI: edit, check and grade exercise libraries from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "exedit", version, about = "Editor and previewer for educational exercises")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Library file (overrides config and EXEDIT_LIBRARY)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and sample library
    Init,

    /// Check a library or import file for problems
    Validate {
        /// File to check (defaults to the library)
        path: Option<PathBuf>,
    },

    /// List exercises
    List {
        #[command(flatten)]
        view: commands::ViewArgs,
    },

    /// Show collection statistics
    Stats,

    /// Create an exercise from the default template of a type
    New {
        /// qcm, fill_in_blanks, fill_in_blanks_options, matching or ordering
        #[arg(value_name = "TYPE")]
        kind: String,
    },

    /// Merge exercises from a JSON file into the library
    Import {
        /// JSON file holding one exercise or an array of them
        file: PathBuf,
    },

    /// Write exercises to a dated JSON file
    Export {
        /// all, filtered, selected, validated or pending
        #[arg(long, default_value = "all")]
        scope: String,

        /// Output directory (defaults to export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Exercise ids for the `selected` scope (comma-separated)
        #[arg(long)]
        select: Option<String>,

        #[command(flatten)]
        view: commands::ViewArgs,
    },

    /// Delete one or more exercises
    Delete {
        /// Exercise ids
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Set the review status of an exercise
    Status {
        id: String,

        /// validated, pending or toggle
        status: String,
    },

    /// Grade answers against an exercise
    Grade {
        id: String,

        /// JSON file with the answers, options given by their text
        #[arg(long)]
        answers: PathBuf,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("exedit=info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let opts = commands::GlobalOpts {
        config: cli.config,
        library: cli.library,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { path } => commands::validate::execute(&opts, path),
        Commands::List { view } => commands::list::execute(&opts, view),
        Commands::Stats => commands::stats::execute(&opts),
        Commands::New { kind } => commands::new::execute(&opts, kind),
        Commands::Import { file } => commands::import::execute(&opts, file),
        Commands::Export {
            scope,
            out,
            select,
            view,
        } => commands::export::execute(&opts, scope, out, select, view),
        Commands::Delete { ids, yes } => commands::delete::execute(&opts, ids, yes),
        Commands::Status { id, status } => commands::status::execute(&opts, id, status),
        Commands::Grade { id, answers, json } => commands::grade::execute(&opts, id, answers, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
