//! In-memory exercise store.
//!
//! Holds the collection, the current exercise and the bulk selection.
//! Identifiers are unique at all times. Every mutation bumps
//! [`ExerciseStore::revision`] so derived views can tell when to refresh.

use std::collections::BTreeSet;

use crate::error::StoreError;
use crate::model::{
    choices_from_texts, ChoiceBlank, Exercise, ExerciseBody, ExerciseType, OptionId, OrderItem,
    Pair, Question, TextBlank, ValidationStatus,
};
use crate::traits::{Confirm, IdSource};

/// The in-memory collection of exercises.
#[derive(Debug, Clone, Default)]
pub struct ExerciseStore {
    exercises: Vec<Exercise>,
    current: Option<String>,
    selected: Vec<String>,
    revision: u64,
}

impl ExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, later duplicates replacing earlier ones.
    pub fn from_exercises(records: Vec<Exercise>) -> Self {
        let mut store = Self::new();
        store.import_merge(records);
        store.current = None;
        store.revision = 0;
        store
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == id)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -----------------------------------------------------------------------
    // Current exercise
    // -----------------------------------------------------------------------

    pub fn current(&self) -> Option<&Exercise> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    /// Make `id` the current exercise.
    pub fn select(&mut self, id: &str) -> Result<&Exercise, StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.current = Some(id.to_string());
        Ok(&self.exercises[idx])
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a default exercise of `kind`, append it and make it current.
    pub fn create(
        &mut self,
        kind: ExerciseType,
        ids: &mut dyn IdSource,
    ) -> Result<&Exercise, StoreError> {
        let mut id = ids.next_id("ex");
        while self.contains(&id) {
            id = ids.next_id("ex");
        }
        let exercise = template(kind, id, ids)?;
        tracing::debug!("created {} exercise {}", kind, exercise.id);

        self.current = Some(exercise.id.clone());
        self.exercises.push(exercise);
        self.touch();
        Ok(&self.exercises[self.exercises.len() - 1])
    }

    /// Replace the exercise with the same identifier and make it current.
    pub fn update(&mut self, exercise: Exercise) -> Result<(), StoreError> {
        let idx = self
            .position(&exercise.id)
            .ok_or_else(|| StoreError::NotFound(exercise.id.clone()))?;
        tracing::debug!("updated exercise {}", exercise.id);
        self.current = Some(exercise.id.clone());
        self.exercises[idx] = exercise;
        self.touch();
        Ok(())
    }

    /// Remove one exercise. Clears the current exercise if it was removed.
    pub fn delete(&mut self, id: &str) -> Result<Exercise, StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.exercises.remove(idx);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.selected.retain(|s| s != id);
        self.touch();
        tracing::debug!("deleted exercise {id}");
        Ok(removed)
    }

    /// [`delete`](Self::delete) after asking `confirm`.
    pub fn delete_confirmed(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Exercise, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !confirm.confirm("Are you sure you want to delete this exercise?") {
            return Err(StoreError::Cancelled);
        }
        self.delete(id)
    }

    /// Remove every listed exercise and return how many were removed.
    ///
    /// If the current exercise is removed, the first remaining exercise
    /// becomes current.
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let doomed: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.exercises.len();
        self.exercises.retain(|e| !doomed.contains(e.id.as_str()));
        let removed = before - self.exercises.len();

        if self
            .current
            .as_deref()
            .is_some_and(|cur| doomed.contains(cur))
        {
            self.current = self.exercises.first().map(|e| e.id.clone());
        }
        self.selected.retain(|s| !doomed.contains(s.as_str()));
        if removed > 0 {
            self.touch();
        }
        tracing::debug!("deleted {removed} exercise(s)");
        removed
    }

    /// Delete the bulk selection after asking `confirm`.
    pub fn delete_selected(&mut self, confirm: &mut dyn Confirm) -> Result<usize, StoreError> {
        if self.selected.is_empty() {
            return Err(StoreError::EmptySelection);
        }
        let prompt = format!(
            "Are you sure you want to delete {} exercise(s)?",
            self.selected.len()
        );
        if !confirm.confirm(&prompt) {
            return Err(StoreError::Cancelled);
        }
        let ids = std::mem::take(&mut self.selected);
        Ok(self.delete_many(&ids))
    }

    pub fn set_status(&mut self, id: &str, status: ValidationStatus) -> Result<(), StoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.exercises[idx].validation_status = status;
        self.touch();
        Ok(())
    }

    /// Merge imported records: overwrite by identifier, otherwise append.
    ///
    /// Returns the number of records processed. When no exercise is current,
    /// the first imported record becomes current.
    pub fn import_merge(&mut self, records: Vec<Exercise>) -> usize {
        let count = records.len();
        let first_id = records.first().map(|e| e.id.clone());
        let mut replaced = 0usize;

        for record in records {
            match self.position(&record.id) {
                Some(idx) => {
                    self.exercises[idx] = record;
                    replaced += 1;
                }
                None => self.exercises.push(record),
            }
        }

        if self.current().is_none() {
            self.current = first_id;
        }
        if count > 0 {
            self.touch();
        }
        tracing::info!(
            "merged {count} exercise(s): {replaced} replaced, {} added",
            count - replaced
        );
        count
    }

    // -----------------------------------------------------------------------
    // Bulk selection
    // -----------------------------------------------------------------------

    /// Selected identifiers in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn toggle_selection(&mut self, id: &str) {
        if let Some(idx) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(idx);
        } else if self.contains(id) {
            self.selected.push(id.to_string());
        }
    }

    /// Deselect `visible` if all of it is selected, otherwise select the rest.
    pub fn toggle_all(&mut self, visible: &[String]) {
        if visible.is_empty() {
            return;
        }
        if visible.iter().all(|id| self.is_selected(id)) {
            self.selected.retain(|s| !visible.contains(s));
        } else {
            for id in visible {
                if !self.is_selected(id) && self.contains(id) {
                    self.selected.push(id.clone());
                }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}

/// Default record for a freshly created exercise of `kind`.
fn template(
    kind: ExerciseType,
    id: String,
    ids: &mut dyn IdSource,
) -> Result<Exercise, StoreError> {
    let (text, explanation, body) = match kind {
        ExerciseType::Qcm => (
            "Nouvel exercice QCM",
            "Explication générale de l'exercice.",
            ExerciseBody::Qcm {
                questions: vec![Question::template(ids.next_id("q"))],
            },
        ),
        ExerciseType::FillInBlanks => (
            "Complétez la phrase : Le ___ est un animal domestique.",
            "Explication de la réponse attendue.",
            ExerciseBody::FillInBlanks {
                blanks: vec![TextBlank {
                    id: ids.next_id("blank"),
                    position: 0,
                    correct_answer: "chat".into(),
                    acceptable_answers: vec!["félin".into(), "matou".into()],
                }],
            },
        ),
        ExerciseType::FillInBlanksOptions => (
            "Complétez la phrase : Le ___ est un animal domestique.",
            "Explication de la réponse attendue.",
            ExerciseBody::FillInBlanksOptions {
                blanks: vec![ChoiceBlank {
                    id: ids.next_id("blank"),
                    position: 0,
                    choices: choices_from_texts(
                        vec!["chat".into(), "chien".into(), "hamster".into(), "poisson".into()],
                        vec![],
                    ),
                    correct: Some(OptionId(1)),
                }],
            },
        ),
        ExerciseType::Matching => (
            "Associez les éléments correspondants :",
            "Explication des associations correctes.",
            ExerciseBody::Matching {
                pairs: (1..=2)
                    .map(|n| Pair {
                        id: ids.next_id("pair"),
                        left: format!("Élément {n}"),
                        right: format!("Correspondance {n}"),
                        left_image: None,
                        right_image: None,
                    })
                    .collect(),
            },
        ),
        ExerciseType::Ordering => (
            "Placez ces éléments dans le bon ordre :",
            "Explication de l'ordre correct.",
            ExerciseBody::Ordering {
                items: ["Première étape", "Deuxième étape", "Troisième étape"]
                    .into_iter()
                    .zip(1u32..)
                    .map(|(text, position)| OrderItem {
                        id: ids.next_id("item"),
                        text: text.into(),
                        position,
                        image: None,
                    })
                    .collect(),
            },
        ),
        ExerciseType::MultipleChoice | ExerciseType::MultipleAnswers => {
            return Err(StoreError::LegacyType(kind));
        }
    };

    Ok(Exercise {
        id,
        text: text.into(),
        image: None,
        explanation: explanation.into(),
        validation_status: ValidationStatus::Pending,
        tags: Vec::new(),
        subject: String::new(),
        level: String::new(),
        concept_name: "Nouvelle notion".into(),
        exercise_number: 1,
        body,
    })
}
