//! JSON import and library validation.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::ImportError;
use crate::markup::{blank_count, math_balanced};
use crate::model::{Choice, Exercise, ExerciseBody};

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a document holding one exercise object or an array of them.
///
/// Either every element parses or the whole document is rejected.
pub fn parse_document(content: &str) -> Result<Vec<Exercise>, ImportError> {
    let root: Value = serde_json::from_str(content)?;
    let elements = match root {
        Value::Array(values) => values,
        object @ Value::Object(_) => vec![object],
        other => return Err(ImportError::InvalidRoot(json_kind(&other))),
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|source| ImportError::InvalidExercise { index, source })
        })
        .collect()
}

/// Parse a document for import into a library. Imported exercises start
/// without tags.
pub fn parse_import(content: &str) -> Result<Vec<Exercise>, ImportError> {
    let mut exercises = parse_document(content)?;
    for exercise in &mut exercises {
        exercise.tags.clear();
    }
    tracing::info!("parsed {} exercise(s) for import", exercises.len());
    Ok(exercises)
}

/// Read a document from disk, keeping every field as written.
pub fn load_document(path: &Path) -> Result<Vec<Exercise>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exercises from {}", path.display()))?;
    let exercises = parse_document(&content)
        .with_context(|| format!("failed to parse exercises in {}", path.display()))?;
    tracing::debug!("loaded {} exercise(s) from {}", exercises.len(), path.display());
    Ok(exercises)
}

/// A warning from library validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The exercise ID (if applicable).
    pub exercise_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a library for problems that parse fine but break editing or grading.
pub fn validate_exercises(exercises: &[Exercise]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for exercise in exercises {
        if exercise.id.trim().is_empty() {
            warnings.push(ValidationWarning {
                exercise_id: None,
                message: "exercise has an empty id".into(),
            });
        } else if !seen_ids.insert(exercise.id.as_str()) {
            warnings.push(ValidationWarning {
                exercise_id: Some(exercise.id.clone()),
                message: format!("duplicate exercise ID: {}", exercise.id),
            });
        }
    }

    for exercise in exercises {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                exercise_id: Some(exercise.id.clone()),
                message,
            })
        };

        if exercise.text.trim().is_empty() {
            warn("prompt is empty".into());
        }
        if !math_balanced(&exercise.text) {
            warn("prompt has an unbalanced `$` math delimiter".into());
        }
        if exercise.kind().is_legacy() {
            warn(format!(
                "legacy type {} can be graded but no longer created",
                exercise.kind()
            ));
        }

        match &exercise.body {
            ExerciseBody::Qcm { questions } => {
                if questions.is_empty() {
                    warn("qcm has no question".into());
                }
                for (i, q) in questions.iter().enumerate() {
                    check_options(&mut warn, &format!("question {}", i + 1), &q.choices);
                    if q.correct.is_empty() {
                        warn(format!("question {} has no correct option", i + 1));
                    }
                    if !math_balanced(&q.text) {
                        warn(format!("question {} has an unbalanced `$` math delimiter", i + 1));
                    }
                }
            }
            ExerciseBody::FillInBlanks { blanks } => {
                let positions: Vec<usize> = blanks.iter().map(|b| b.position).collect();
                check_blanks(&mut warn, &exercise.text, &positions);
                for (i, b) in blanks.iter().enumerate() {
                    if b.correct_answer.trim().is_empty() {
                        warn(format!("blank {} has no correct answer", i + 1));
                    }
                }
            }
            ExerciseBody::FillInBlanksOptions { blanks } => {
                let positions: Vec<usize> = blanks.iter().map(|b| b.position).collect();
                check_blanks(&mut warn, &exercise.text, &positions);
                for (i, b) in blanks.iter().enumerate() {
                    check_options(&mut warn, &format!("blank {}", i + 1), &b.choices);
                    if b.correct.is_none() {
                        warn(format!("blank {} has no correct option", i + 1));
                    }
                }
            }
            ExerciseBody::Matching { pairs } => {
                if pairs.len() < 2 {
                    warn(format!("matching has {} pair(s), at least 2 needed", pairs.len()));
                }
            }
            ExerciseBody::Ordering { items } => {
                if items.len() < 2 {
                    warn(format!("ordering has {} item(s), at least 2 needed", items.len()));
                }
                let mut positions = BTreeSet::new();
                for item in items {
                    if !positions.insert(item.position) {
                        warn(format!("position {} is used by more than one item", item.position));
                    }
                }
            }
            ExerciseBody::MultipleChoice(single) => {
                check_options(&mut warn, "exercise", &single.choices);
                if single.correct.is_none() {
                    warn("no correct option".into());
                }
            }
            ExerciseBody::MultipleAnswers(multi) => {
                check_options(&mut warn, "exercise", &multi.choices);
                if multi.correct.is_empty() {
                    warn("no correct option".into());
                }
            }
        }
    }

    warnings
}

fn check_options(warn: &mut impl FnMut(String), owner: &str, choices: &[Choice]) {
    if choices.len() < 2 {
        warn(format!("{owner} has {} option(s), at least 2 needed", choices.len()));
    }
    let mut seen = BTreeSet::new();
    for choice in choices {
        if !seen.insert(choice.text.as_str()) {
            warn(format!("{owner} has more than one option {:?}", choice.text));
        }
    }
}

fn check_blanks(warn: &mut impl FnMut(String), prompt: &str, positions: &[usize]) {
    let markers = blank_count(prompt);
    if positions.is_empty() {
        warn("exercise has no blank".into());
    }
    if markers != positions.len() {
        warn(format!(
            "prompt has {markers} blank marker(s) but {} blank(s) are defined",
            positions.len()
        ));
    }
    for position in positions {
        if *position >= markers {
            warn(format!("blank position {position} has no marker in the prompt"));
        }
    }
}
