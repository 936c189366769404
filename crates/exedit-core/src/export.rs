//! JSON export.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::error::ExportError;
use crate::model::Exercise;
use crate::store::ExerciseStore;
use crate::view::{visible, ViewQuery};

/// Which exercises an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    /// What the current view shows.
    Filtered,
    /// The bulk selection.
    Selected,
    Validated,
    /// Everything not validated.
    Pending,
}

impl ExportScope {
    pub const ALL: [ExportScope; 5] = [
        ExportScope::All,
        ExportScope::Filtered,
        ExportScope::Selected,
        ExportScope::Validated,
        ExportScope::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportScope::All => "all",
            ExportScope::Filtered => "filtered",
            ExportScope::Selected => "selected",
            ExportScope::Validated => "validated",
            ExportScope::Pending => "pending",
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ExportScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == wanted)
            .ok_or_else(|| format!("unknown export scope: {s}"))
    }
}

/// The exercises a scope covers, in store order (view order for `filtered`).
pub fn candidates<'a>(
    store: &'a ExerciseStore,
    query: &ViewQuery,
    scope: ExportScope,
) -> Vec<&'a Exercise> {
    let all = store.exercises();
    match scope {
        ExportScope::All => all.iter().collect(),
        ExportScope::Filtered => visible(all, query),
        ExportScope::Selected => all.iter().filter(|e| store.is_selected(&e.id)).collect(),
        ExportScope::Validated => all.iter().filter(|e| e.is_validated()).collect(),
        ExportScope::Pending => all.iter().filter(|e| !e.is_validated()).collect(),
    }
}

/// `exercises_<scope>_<YYYY-MM-DD>.json`
pub fn file_name(scope: ExportScope, date: NaiveDate) -> String {
    format!("exercises_{scope}_{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON array.
pub fn to_json(exercises: &[&Exercise]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(exercises)?)
}

/// A rendered export, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
    pub count: usize,
}

impl ExportFile {
    /// Render `scope`; an empty scope yields no file.
    pub fn build(
        store: &ExerciseStore,
        query: &ViewQuery,
        scope: ExportScope,
        date: NaiveDate,
    ) -> Result<Self, ExportError> {
        let exercises = candidates(store, query, scope);
        if exercises.is_empty() {
            return Err(ExportError::Empty(scope));
        }
        Ok(Self {
            file_name: file_name(scope, date),
            contents: to_json(&exercises)?,
            count: exercises.len(),
        })
    }

    /// Write into `dir` and return the full path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        tracing::info!("exported {} exercise(s) to {}", self.count, path.display());
        Ok(path)
    }
}

/// Write a whole library back to `path`.
pub fn save_library(path: &Path, exercises: &[Exercise]) -> Result<()> {
    let refs: Vec<&Exercise> = exercises.iter().collect();
    let json = to_json(&refs).context("failed to serialize library")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write library to {}", path.display()))?;
    tracing::debug!("saved {} exercise(s) to {}", exercises.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{load_document, parse_document};
    use crate::model::{ExerciseType, ValidationStatus};
    use crate::traits::SequentialIds;
    use crate::view::{Filters, Selector};

    fn store() -> ExerciseStore {
        let mut store = ExerciseStore::new();
        let mut ids = SequentialIds::new();
        for kind in [ExerciseType::Qcm, ExerciseType::Matching, ExerciseType::Ordering] {
            store.create(kind, &mut ids).unwrap();
        }
        let first = store.exercises()[0].id.clone();
        store.set_status(&first, ValidationStatus::Validated).unwrap();
        store
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn file_name_has_scope_and_date() {
        assert_eq!(
            file_name(ExportScope::Validated, date()),
            "exercises_validated_2024-03-09.json"
        );
    }

    #[test]
    fn scopes_pick_expected_records() {
        let mut store = store();
        let query = ViewQuery {
            filters: Filters {
                kind: Selector::Only(ExerciseType::Matching),
                ..Filters::default()
            },
            ..ViewQuery::default()
        };
        let count = |store: &ExerciseStore, scope| candidates(store, &query, scope).len();
        assert_eq!(count(&store, ExportScope::All), 3);
        assert_eq!(count(&store, ExportScope::Validated), 1);
        assert_eq!(count(&store, ExportScope::Pending), 2);
        assert_eq!(count(&store, ExportScope::Filtered), 1);
        assert_eq!(count(&store, ExportScope::Selected), 0);

        let id = store.exercises()[2].id.clone();
        store.toggle_selection(&id);
        assert_eq!(candidates(&store, &query, ExportScope::Selected)[0].id, id);
    }

    #[test]
    fn empty_scope_produces_no_file() {
        let mut store = ExerciseStore::new();
        store.import_merge(parse_document(r#"{"id": "x", "type": "matching"}"#).unwrap());
        let err = ExportFile::build(&store, &ViewQuery::default(), ExportScope::Validated, date())
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty(ExportScope::Validated)));
        assert_eq!(err.to_string(), "no exercise to export for scope validated");
    }

    #[test]
    fn export_round_trips_through_import() {
        let store = store();
        let dir = tempfile::tempdir().unwrap();
        let file = ExportFile::build(&store, &ViewQuery::default(), ExportScope::All, date()).unwrap();
        assert!(file.contents.starts_with("[\n"));
        let path = file.save(dir.path()).unwrap();
        assert!(path.ends_with("exercises_all_2024-03-09.json"));
        assert_eq!(load_document(&path).unwrap(), store.exercises());
    }

    #[test]
    fn library_is_saved_in_place() {
        let store = store();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("library.json");
        save_library(&path, store.exercises()).unwrap();
        assert_eq!(load_document(&path).unwrap().len(), 3);
    }

    #[test]
    fn scope_parses() {
        assert_eq!("Pending".parse::<ExportScope>().unwrap(), ExportScope::Pending);
        assert!("draft".parse::<ExportScope>().is_err());
    }
}
