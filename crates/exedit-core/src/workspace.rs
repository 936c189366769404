//! Editing session facade.
//!
//! A [`Workspace`] ties the store, the current view query and the
//! notification slot together. Every user-facing operation reports its
//! outcome as a [`Notification`] in addition to its return value.

use std::fmt::Display;
use std::time::Instant;

use chrono::NaiveDate;
use rand::Rng;

use crate::editor::ExerciseDraft;
use crate::error::{ExportError, ImportError, StoreError};
use crate::export::{ExportFile, ExportScope};
use crate::grader::PreviewSession;
use crate::import::parse_import;
use crate::model::{Exercise, ExerciseType, ValidationStatus};
use crate::notify::Notification;
use crate::stats::CollectionStats;
use crate::store::ExerciseStore;
use crate::traits::{Confirm, IdSource, UuidIds};
use crate::view::{visible, ViewQuery};

pub struct Workspace {
    store: ExerciseStore,
    query: ViewQuery,
    notification: Option<Notification>,
    ids: Box<dyn IdSource>,
}

impl Workspace {
    pub fn new(store: ExerciseStore) -> Self {
        Self::with_ids(store, Box::new(UuidIds))
    }

    pub fn with_ids(store: ExerciseStore, ids: Box<dyn IdSource>) -> Self {
        Self {
            store,
            query: ViewQuery::default(),
            notification: None,
            ids,
        }
    }

    pub fn store(&self) -> &ExerciseStore {
        &self.store
    }

    pub fn into_store(self) -> ExerciseStore {
        self.store
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut ViewQuery {
        &mut self.query
    }

    /// Exercises the current query shows, in display order.
    pub fn visible(&self) -> Vec<&Exercise> {
        visible(self.store.exercises(), &self.query)
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::compute(self.store.exercises())
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// The latest notification, unless it has expired by `now`.
    pub fn notification_at(&self, now: Instant) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| !n.is_expired_at(now))
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Instant::now())
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    fn report<T, E: Display>(
        &mut self,
        result: Result<T, E>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, E> {
        self.notification = Some(match &result {
            Ok(value) => Notification::success(success(value)),
            Err(e) => Notification::error(e.to_string()),
        });
        result
    }

    fn report_store<T>(
        &mut self,
        result: Result<T, StoreError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, StoreError> {
        // declining a confirmation is not worth a notification
        if matches!(result, Err(StoreError::Cancelled)) {
            return result;
        }
        self.report(result, success)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Create an exercise of `kind` and return its id.
    pub fn create(&mut self, kind: ExerciseType) -> Result<String, StoreError> {
        let result = self
            .store
            .create(kind, self.ids.as_mut())
            .map(|e| e.id.clone());
        self.report_store(result, |_| format!("Nouvel exercice créé : {}", kind.label()))
    }

    /// Make `id` current and open a draft of it.
    pub fn edit(&mut self, id: &str) -> Result<ExerciseDraft, StoreError> {
        self.store.select(id).cloned().map(ExerciseDraft::new)
    }

    /// Id source for editor operations that append parts.
    pub fn ids(&mut self) -> &mut dyn IdSource {
        self.ids.as_mut()
    }

    pub fn save(&mut self, draft: &ExerciseDraft) -> Result<(), StoreError> {
        let result = draft.save(&mut self.store);
        self.report_store(result, |_| "Exercice mis à jour avec succès".to_string())
    }

    /// Import a JSON document. Nothing changes if any element is invalid.
    pub fn import_json(&mut self, content: &str) -> Result<usize, ImportError> {
        let result = parse_import(content).map(|records| self.store.import_merge(records));
        self.report(result, |n| format!("{n} exercice(s) importé(s) avec succès"))
    }

    /// Render an export of `scope`. Writing it is up to the caller.
    pub fn export(&mut self, scope: ExportScope, date: NaiveDate) -> Result<ExportFile, ExportError> {
        let result = ExportFile::build(&self.store, &self.query, scope, date);
        self.report(result, |file| {
            format!("{} exercice(s) exporté(s) dans {}", file.count, file.file_name)
        })
    }

    pub fn delete(&mut self, id: &str, confirm: &mut dyn Confirm) -> Result<Exercise, StoreError> {
        let result = self.store.delete_confirmed(id, confirm);
        self.report_store(result, |_| "Exercice supprimé".to_string())
    }

    pub fn toggle_selection(&mut self, id: &str) {
        self.store.toggle_selection(id);
    }

    /// Select every visible exercise, or deselect them if all are selected.
    pub fn toggle_all_visible(&mut self) {
        let ids: Vec<String> = self.visible().into_iter().map(|e| e.id.clone()).collect();
        self.store.toggle_all(&ids);
    }

    pub fn delete_selected(&mut self, confirm: &mut dyn Confirm) -> Result<usize, StoreError> {
        let result = self.store.delete_selected(confirm);
        self.report_store(result, |n| format!("{n} exercice(s) supprimé(s)"))
    }

    pub fn set_status(&mut self, id: &str, status: ValidationStatus) -> Result<(), StoreError> {
        let result = self.store.set_status(id, status);
        self.report_store(result, |_| format!("Exercice marqué comme {}", status.label()))
    }

    /// Start previewing `id`.
    pub fn preview<R: Rng + ?Sized>(
        &self,
        id: &str,
        rng: &mut R,
    ) -> Result<PreviewSession<'_>, StoreError> {
        let exercise = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(PreviewSession::new(exercise, rng))
    }
}
