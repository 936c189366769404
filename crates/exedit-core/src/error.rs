//! Error types.
//!
//! Each component reports failures through its own enum so callers can turn
//! them into notifications without string matching.

use thiserror::Error;

use crate::export::ExportScope;
use crate::model::{ExerciseType, OptionId};

/// Errors raised by the exercise store.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// No exercise has the given identifier.
    #[error("exercise not found: {0}")]
    NotFound(String),

    /// Legacy types can only be imported.
    #[error("exercises of type {0} can no longer be created")]
    LegacyType(ExerciseType),

    /// Bulk action requested with nothing selected.
    #[error("no exercise selected")]
    EmptySelection,

    /// The user declined a destructive action.
    #[error("action cancelled")]
    Cancelled,
}

/// Errors raised by the form editor.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    /// Removing would leave fewer entries than the type requires.
    #[error("cannot remove {what}: at least {min} required")]
    BelowMinimum { what: &'static str, min: usize },

    /// Index does not address an existing entry.
    #[error("no {what} at index {index}")]
    OutOfRange { what: &'static str, index: usize },

    /// Option id does not exist in the addressed list.
    #[error("unknown option {0}")]
    UnknownOption(OptionId),

    /// Another option in the same list already has this text.
    #[error("an option with text {0:?} already exists")]
    DuplicateOption(String),

    /// Operation does not apply to this exercise type.
    #[error("{operation} does not apply to {kind} exercises")]
    WrongKind {
        operation: &'static str,
        kind: ExerciseType,
    },
}

/// Errors raised while reading an import document.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The root is neither an object nor an array.
    #[error("expected an exercise object or an array of exercises, found {0}")]
    InvalidRoot(&'static str),

    /// An element could not be read as an exercise.
    #[error("exercise #{index} is invalid: {source}")]
    InvalidExercise {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while producing an export document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing matches the requested scope.
    #[error("no exercise to export for scope {0}")]
    Empty(ExportScope),

    #[error("failed to serialize exercises: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while building or grading an answer sheet.
#[derive(Debug, Error, PartialEq)]
pub enum GradeError {
    /// The answer sheet was built for another exercise type.
    #[error("answer sheet for {found} cannot grade a {expected} exercise")]
    KindMismatch {
        expected: ExerciseType,
        found: ExerciseType,
    },

    /// An answer names an option the exercise does not have.
    #[error("no option with text {0:?}")]
    UnknownOption(String),

    /// The answer document does not have the shape the type needs.
    #[error("malformed answers: {0}")]
    Malformed(String),
}

/// Errors raised by a preview session.
#[derive(Debug, Error, PartialEq)]
pub enum PreviewError {
    /// Inputs are frozen until the session is reset.
    #[error("answers are frozen until the exercise is reset")]
    Frozen,

    /// Input does not fit the exercise being previewed.
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Grade(#[from] GradeError),
}
