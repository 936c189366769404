//! `exedit.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::view::{SortDirection, SortKey};

/// Environment variable overriding [`ExeditConfig::library`].
pub const LIBRARY_ENV: &str = "EXEDIT_LIBRARY";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExeditConfig {
    /// Library file the CLI loads and saves.
    #[serde(default = "default_library")]
    pub library: PathBuf,
    /// Directory exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub sort_order: SortDirection,
}

fn default_library() -> PathBuf {
    PathBuf::from("exercises.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExeditConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            export_dir: default_export_dir(),
            sort_by: SortKey::default(),
            sort_order: SortDirection::default(),
        }
    }
}

/// Load config from the default locations.
pub fn load_config() -> Result<ExeditConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search `./exedit.toml` then
/// `~/.config/exedit/config.toml`.
pub fn load_config_from(path: Option<&Path>) -> Result<ExeditConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("exedit.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<ExeditConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ExeditConfig::default(),
    };

    if let Some(library) = std::env::var_os(LIBRARY_ENV).filter(|v| !v.is_empty()) {
        config.library = PathBuf::from(library);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("exedit"))
}

/// The config `exedit init` writes.
pub const SAMPLE_CONFIG: &str = r#"# exedit configuration

# Library file loaded and saved by every command.
library = "exercises.json"

# Where `exedit export` writes its files.
export_dir = "exports"

# concept_name | subject | level | exercise_number
sort_by = "concept_name"

# asc | desc
sort_order = "asc"
"#;
