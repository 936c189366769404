//! Answer sheets, grading, and the preview session state machine.
//!
//! [`grade`] is a pure function of an exercise and an [`AnswerSheet`].
//! A [`PreviewSession`] holds the learner's answers while they work and
//! freezes them once submitted, until [`PreviewSession::reset`].

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GradeError, PreviewError};
use crate::import::json_kind;
use crate::model::{find_choice, Choice, Exercise, ExerciseBody, ExerciseType, OptionId, OrderItem};

// ---------------------------------------------------------------------------
// Answer sheets
// ---------------------------------------------------------------------------

/// The learner's answers, shaped after the exercise type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerSheet {
    /// Selected options per question.
    Qcm(Vec<BTreeSet<OptionId>>),
    /// Typed text per blank.
    FillInBlanks(Vec<String>),
    /// Selected option per blank.
    FillInBlanksOptions(Vec<Option<OptionId>>),
    /// Chosen right value per pair id.
    Matching(BTreeMap<String, String>),
    /// Item ids in the learner's order.
    Ordering(Vec<String>),
    MultipleChoice(Option<OptionId>),
    MultipleAnswers(BTreeSet<OptionId>),
}

impl AnswerSheet {
    pub fn kind(&self) -> ExerciseType {
        match self {
            AnswerSheet::Qcm(_) => ExerciseType::Qcm,
            AnswerSheet::FillInBlanks(_) => ExerciseType::FillInBlanks,
            AnswerSheet::FillInBlanksOptions(_) => ExerciseType::FillInBlanksOptions,
            AnswerSheet::Matching(_) => ExerciseType::Matching,
            AnswerSheet::Ordering(_) => ExerciseType::Ordering,
            AnswerSheet::MultipleChoice(_) => ExerciseType::MultipleChoice,
            AnswerSheet::MultipleAnswers(_) => ExerciseType::MultipleAnswers,
        }
    }

    /// An unanswered sheet. Ordering exercises start from a shuffled order.
    pub fn blank_for<R: Rng + ?Sized>(exercise: &Exercise, rng: &mut R) -> Self {
        match &exercise.body {
            ExerciseBody::Qcm { questions } => AnswerSheet::Qcm(vec![BTreeSet::new(); questions.len()]),
            ExerciseBody::FillInBlanks { blanks } => {
                AnswerSheet::FillInBlanks(vec![String::new(); blanks.len()])
            }
            ExerciseBody::FillInBlanksOptions { blanks } => {
                AnswerSheet::FillInBlanksOptions(vec![None; blanks.len()])
            }
            ExerciseBody::Matching { .. } => AnswerSheet::Matching(BTreeMap::new()),
            ExerciseBody::Ordering { items } => AnswerSheet::Ordering(shuffled_order(items, rng)),
            ExerciseBody::MultipleChoice(_) => AnswerSheet::MultipleChoice(None),
            ExerciseBody::MultipleAnswers(_) => AnswerSheet::MultipleAnswers(BTreeSet::new()),
        }
    }

    /// Read answers from JSON, naming options by their text.
    ///
    /// | type | shape |
    /// |------|-------|
    /// | `qcm` | `[["Paris"], ["A", "C"]]` |
    /// | `fill_in_blanks` | `["chat", "noir"]` |
    /// | `fill_in_blanks_options` | `["chat", null]` |
    /// | `matching` | `{"pair-1": "Un"}` |
    /// | `ordering` | `["item-2", "item-1"]` |
    /// | `multiple_choice` | `"4"` or `null` |
    /// | `multiple_answers` | `["2", "4"]` |
    pub fn from_json(exercise: &Exercise, value: &Value) -> Result<Self, GradeError> {
        match &exercise.body {
            ExerciseBody::Qcm { questions } => {
                let rows = array(value, "a list of selections per question")?;
                if rows.len() > questions.len() {
                    return Err(GradeError::Malformed(format!(
                        "{} selections given for {} questions",
                        rows.len(),
                        questions.len()
                    )));
                }
                let mut sheet = vec![BTreeSet::new(); questions.len()];
                for ((slot, row), question) in sheet.iter_mut().zip(rows).zip(questions) {
                    for text in strings(row, "a list of option texts")? {
                        slot.insert(resolve(&question.choices, text)?);
                    }
                }
                Ok(AnswerSheet::Qcm(sheet))
            }
            ExerciseBody::FillInBlanks { blanks } => {
                let mut answers: Vec<String> = strings(value, "a list of blank answers")?
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                fit_length(&mut answers, blanks.len(), "blank answers")?;
                Ok(AnswerSheet::FillInBlanks(answers))
            }
            ExerciseBody::FillInBlanksOptions { blanks } => {
                let picks = array(value, "a list of selected options")?;
                if picks.len() > blanks.len() {
                    return Err(GradeError::Malformed(format!(
                        "{} selections given for {} blanks",
                        picks.len(),
                        blanks.len()
                    )));
                }
                let mut sheet = vec![None; blanks.len()];
                for ((slot, pick), blank) in sheet.iter_mut().zip(picks).zip(blanks) {
                    *slot = match pick {
                        Value::Null => None,
                        Value::String(text) => Some(resolve(&blank.choices, text)?),
                        other => return Err(unexpected("an option text or null", other)),
                    };
                }
                Ok(AnswerSheet::FillInBlanksOptions(sheet))
            }
            ExerciseBody::Matching { pairs } => {
                let Value::Object(map) = value else {
                    return Err(unexpected("an object of pair id to right value", value));
                };
                let mut sheet = BTreeMap::new();
                for (pair_id, right) in map {
                    if !pairs.iter().any(|p| &p.id == pair_id) {
                        return Err(GradeError::Malformed(format!("no pair with id {pair_id:?}")));
                    }
                    let Value::String(right) = right else {
                        return Err(unexpected("a right value", right));
                    };
                    sheet.insert(pair_id.clone(), right.clone());
                }
                Ok(AnswerSheet::Matching(sheet))
            }
            ExerciseBody::Ordering { items } => {
                let order: Vec<String> = strings(value, "a list of item ids")?
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                let mut given = order.clone();
                let mut expected: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
                given.sort();
                expected.sort();
                if given != expected {
                    return Err(GradeError::Malformed(
                        "ordering answer must list every item id exactly once".into(),
                    ));
                }
                Ok(AnswerSheet::Ordering(order))
            }
            ExerciseBody::MultipleChoice(single) => match value {
                Value::Null => Ok(AnswerSheet::MultipleChoice(None)),
                Value::String(text) => Ok(AnswerSheet::MultipleChoice(Some(resolve(
                    &single.choices,
                    text,
                )?))),
                other => Err(unexpected("an option text or null", other)),
            },
            ExerciseBody::MultipleAnswers(multi) => {
                let mut sheet = BTreeSet::new();
                for text in strings(value, "a list of option texts")? {
                    sheet.insert(resolve(&multi.choices, text)?);
                }
                Ok(AnswerSheet::MultipleAnswers(sheet))
            }
        }
    }
}

fn unexpected(expected: &str, found: &Value) -> GradeError {
    GradeError::Malformed(format!("expected {expected}, found {}", json_kind(found)))
}

fn array<'v>(value: &'v Value, expected: &str) -> Result<&'v [Value], GradeError> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(unexpected(expected, other)),
    }
}

fn strings<'v>(value: &'v Value, expected: &str) -> Result<Vec<&'v str>, GradeError> {
    array(value, expected)?
        .iter()
        .map(|v| v.as_str().ok_or_else(|| unexpected(expected, v)))
        .collect()
}

fn resolve(choices: &[Choice], text: &str) -> Result<OptionId, GradeError> {
    find_choice(choices, text).ok_or_else(|| GradeError::UnknownOption(text.to_string()))
}

fn fit_length(answers: &mut Vec<String>, len: usize, what: &str) -> Result<(), GradeError> {
    if answers.len() > len {
        return Err(GradeError::Malformed(format!(
            "{} {what} given for {len} blanks",
            answers.len()
        )));
    }
    answers.resize(len, String::new());
    Ok(())
}

// ---------------------------------------------------------------------------
// Ordering helpers
// ---------------------------------------------------------------------------

/// Item ids sorted by target position.
pub fn solved_order(items: &[OrderItem]) -> Vec<String> {
    let mut sorted: Vec<&OrderItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.position);
    sorted.into_iter().map(|item| item.id.clone()).collect()
}

/// A random order of the item ids that is never the solved one when there
/// are at least two items.
pub fn shuffled_order<R: Rng + ?Sized>(items: &[OrderItem], rng: &mut R) -> Vec<String> {
    let solved = solved_order(items);
    let mut order = solved.clone();
    order.shuffle(rng);
    if order.len() >= 2 && order == solved {
        order.rotate_left(1);
    }
    order
}

/// Drag `dragged` onto `target`: remove it, then insert it at the index
/// `target` had. Returns `false` when either id is missing.
fn move_onto(order: &mut Vec<String>, dragged: &str, target: &str) -> bool {
    let (Some(from), Some(to)) = (
        order.iter().position(|id| id == dragged),
        order.iter().position(|id| id == target),
    ) else {
        return false;
    };
    if from != to {
        let id = order.remove(from);
        order.insert(to, id);
    }
    true
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

/// Outcome of grading one answer sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// Number of correct elements (questions, blanks, pairs or positions).
    pub correct: usize,
    pub total: usize,
    /// Correctness of each element, in exercise order.
    pub elements: Vec<bool>,
    pub message: String,
}

impl Verdict {
    fn from_elements(elements: Vec<bool>, on_pass: &str, on_fail: &str) -> Self {
        let passed = elements.iter().all(|ok| *ok);
        Self::build(passed, elements, if passed { on_pass } else { on_fail }.to_string())
    }

    fn build(passed: bool, elements: Vec<bool>, message: String) -> Self {
        Self {
            passed,
            correct: elements.iter().filter(|ok| **ok).count(),
            total: elements.len(),
            elements,
            message,
        }
    }
}

fn answer_matches(answer: &str, expected: &str, alternatives: &[String]) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == expected.to_lowercase() || alternatives.iter().any(|alt| answer == alt.to_lowercase())
}

/// Grade `answers` against `exercise`.
pub fn grade(exercise: &Exercise, answers: &AnswerSheet) -> Result<Verdict, GradeError> {
    let verdict = match (&exercise.body, answers) {
        (ExerciseBody::Qcm { questions }, AnswerSheet::Qcm(selected)) => {
            let elements: Vec<bool> = questions
                .iter()
                .enumerate()
                .map(|(i, q)| selected.get(i).map_or(q.correct.is_empty(), |s| *s == q.correct))
                .collect();
            let passed = elements.iter().all(|ok| *ok);
            let correct = elements.iter().filter(|ok| **ok).count();
            let message = if passed {
                "Toutes les questions sont correctes !".to_string()
            } else {
                format!("{correct} question(s) correcte(s) sur {}.", questions.len())
            };
            Verdict::build(passed, elements, message)
        }
        (ExerciseBody::FillInBlanks { blanks }, AnswerSheet::FillInBlanks(typed)) => {
            let elements = blanks
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    typed
                        .get(i)
                        .is_some_and(|t| answer_matches(t, &b.correct_answer, &b.acceptable_answers))
                })
                .collect();
            Verdict::from_elements(
                elements,
                "Tous les trous sont correctement remplis !",
                "Un ou plusieurs trous sont incorrectement remplis.",
            )
        }
        (ExerciseBody::FillInBlanksOptions { blanks }, AnswerSheet::FillInBlanksOptions(picked)) => {
            let elements = blanks
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let pick = picked.get(i).copied().flatten();
                    pick.is_some() && pick == b.correct
                })
                .collect();
            Verdict::from_elements(
                elements,
                "Tous les trous sont correctement remplis !",
                "Un ou plusieurs trous sont incorrectement remplis.",
            )
        }
        (ExerciseBody::Matching { pairs }, AnswerSheet::Matching(chosen)) => {
            let elements = pairs
                .iter()
                .map(|p| chosen.get(&p.id).is_some_and(|right| *right == p.right))
                .collect();
            Verdict::from_elements(
                elements,
                "Toutes les associations sont correctes !",
                "Une ou plusieurs associations sont incorrectes.",
            )
        }
        (ExerciseBody::Ordering { items }, AnswerSheet::Ordering(order)) => {
            let solved = solved_order(items);
            let elements = solved
                .iter()
                .enumerate()
                .map(|(i, id)| order.get(i) == Some(id))
                .collect();
            let passed = *order == solved;
            let message = if passed {
                "L'ordre est correct !"
            } else {
                "L'ordre n'est pas correct."
            };
            Verdict::build(passed, elements, message.to_string())
        }
        (ExerciseBody::MultipleChoice(single), AnswerSheet::MultipleChoice(pick)) => {
            Verdict::from_elements(
                vec![pick.is_some() && *pick == single.correct],
                "Bonne réponse !",
                "Réponse incorrecte. Réessayez.",
            )
        }
        (ExerciseBody::MultipleAnswers(multi), AnswerSheet::MultipleAnswers(picked)) => {
            Verdict::from_elements(
                vec![*picked == multi.correct],
                "Toutes les bonnes réponses ont été sélectionnées !",
                "Certaines réponses sont incorrectes ou il manque des réponses correctes.",
            )
        }
        _ => {
            return Err(GradeError::KindMismatch {
                expected: exercise.kind(),
                found: answers.kind(),
            })
        }
    };
    tracing::debug!(
        "graded {} ({}): {}/{} correct",
        exercise.id,
        exercise.kind(),
        verdict.correct,
        verdict.total
    );
    Ok(verdict)
}

// ---------------------------------------------------------------------------
// Preview session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Answering,
    Graded,
}

/// A learner working through one exercise.
#[derive(Debug, Clone)]
pub struct PreviewSession<'a> {
    exercise: &'a Exercise,
    answers: AnswerSheet,
    verdict: Option<Verdict>,
}

impl<'a> PreviewSession<'a> {
    pub fn new<R: Rng + ?Sized>(exercise: &'a Exercise, rng: &mut R) -> Self {
        Self {
            exercise,
            answers: AnswerSheet::blank_for(exercise, rng),
            verdict: None,
        }
    }

    pub fn exercise(&self) -> &'a Exercise {
        self.exercise
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn state(&self) -> PreviewState {
        if self.verdict.is_some() {
            PreviewState::Graded
        } else {
            PreviewState::Answering
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// The exercise explanation, once graded.
    pub fn explanation(&self) -> Option<&'a str> {
        let text = self.exercise.explanation.as_str();
        (self.verdict.is_some() && !text.is_empty()).then_some(text)
    }

    /// Explanation of one `qcm` question, once graded.
    pub fn question_explanation(&self, question: usize) -> Option<&'a str> {
        if self.verdict.is_none() {
            return None;
        }
        match &self.exercise.body {
            ExerciseBody::Qcm { questions } => questions
                .get(question)
                .map(|q| q.explanation.as_str())
                .filter(|text| !text.is_empty()),
            _ => None,
        }
    }

    /// Right-hand values offered for every pair, sorted.
    pub fn matching_targets(&self) -> Vec<&'a str> {
        match &self.exercise.body {
            ExerciseBody::Matching { pairs } => {
                let targets: BTreeSet<&str> = pairs.iter().map(|p| p.right.as_str()).collect();
                targets.into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn editable(&mut self) -> Result<(&'a Exercise, &mut AnswerSheet), PreviewError> {
        if self.verdict.is_some() {
            return Err(PreviewError::Frozen);
        }
        Ok((self.exercise, &mut self.answers))
    }

    /// Select or deselect an option of a `qcm` question.
    pub fn toggle_option(&mut self, question: usize, option: OptionId) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        let (ExerciseBody::Qcm { questions }, AnswerSheet::Qcm(selected)) = (&exercise.body, answers)
        else {
            return Err(wrong_input("toggle_option", exercise));
        };
        let q = questions
            .get(question)
            .ok_or_else(|| PreviewError::Input(format!("no question at index {question}")))?;
        known_option(&q.choices, option)?;
        let slot = selected
            .get_mut(question)
            .ok_or_else(|| PreviewError::Input(format!("no question at index {question}")))?;
        if !slot.remove(&option) {
            slot.insert(option);
        }
        Ok(())
    }

    /// Pick an option of a legacy exercise. Multiple-answer lists toggle.
    pub fn select_legacy(&mut self, option: OptionId) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        match (&exercise.body, answers) {
            (ExerciseBody::MultipleChoice(single), AnswerSheet::MultipleChoice(pick)) => {
                known_option(&single.choices, option)?;
                *pick = Some(option);
            }
            (ExerciseBody::MultipleAnswers(multi), AnswerSheet::MultipleAnswers(picked)) => {
                known_option(&multi.choices, option)?;
                if !picked.remove(&option) {
                    picked.insert(option);
                }
            }
            _ => return Err(wrong_input("select_legacy", exercise)),
        }
        Ok(())
    }

    pub fn fill_blank(&mut self, blank: usize, text: impl Into<String>) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        let AnswerSheet::FillInBlanks(typed) = answers else {
            return Err(wrong_input("fill_blank", exercise));
        };
        let slot = typed
            .get_mut(blank)
            .ok_or_else(|| PreviewError::Input(format!("no blank at index {blank}")))?;
        *slot = text.into();
        Ok(())
    }

    pub fn choose_blank_option(&mut self, blank: usize, option: OptionId) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        let (ExerciseBody::FillInBlanksOptions { blanks }, AnswerSheet::FillInBlanksOptions(picked)) =
            (&exercise.body, answers)
        else {
            return Err(wrong_input("choose_blank_option", exercise));
        };
        let b = blanks
            .get(blank)
            .ok_or_else(|| PreviewError::Input(format!("no blank at index {blank}")))?;
        known_option(&b.choices, option)?;
        if let Some(slot) = picked.get_mut(blank) {
            *slot = Some(option);
        }
        Ok(())
    }

    pub fn match_pair(&mut self, pair_id: &str, right: impl Into<String>) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        let (ExerciseBody::Matching { pairs }, AnswerSheet::Matching(chosen)) = (&exercise.body, answers)
        else {
            return Err(wrong_input("match_pair", exercise));
        };
        if !pairs.iter().any(|p| p.id == pair_id) {
            return Err(PreviewError::Input(format!("no pair with id {pair_id:?}")));
        }
        chosen.insert(pair_id.to_string(), right.into());
        Ok(())
    }

    /// Drop item `dragged` onto item `target`.
    pub fn move_item(&mut self, dragged: &str, target: &str) -> Result<(), PreviewError> {
        let (exercise, answers) = self.editable()?;
        let AnswerSheet::Ordering(order) = answers else {
            return Err(wrong_input("move_item", exercise));
        };
        if !move_onto(order, dragged, target) {
            return Err(PreviewError::Input(format!(
                "cannot move {dragged:?} onto {target:?}: unknown item"
            )));
        }
        Ok(())
    }

    /// Grade the current answers and freeze them. Submitting again returns
    /// the same verdict.
    pub fn submit(&mut self) -> Result<&Verdict, PreviewError> {
        let verdict = match self.verdict.take() {
            Some(verdict) => verdict,
            None => grade(self.exercise, &self.answers)?,
        };
        Ok(self.verdict.insert(verdict))
    }

    /// Clear answers and feedback. Ordering exercises get a fresh shuffle.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.answers = AnswerSheet::blank_for(self.exercise, rng);
        self.verdict = None;
    }
}

fn known_option(choices: &[Choice], option: OptionId) -> Result<(), PreviewError> {
    if choices.iter().any(|c| c.id == option) {
        Ok(())
    } else {
        Err(PreviewError::Input(format!("unknown option {option}")))
    }
}

fn wrong_input(operation: &str, exercise: &Exercise) -> PreviewError {
    PreviewError::Input(format!(
        "{operation} does not apply to {} exercises",
        exercise.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn exercise(value: Value) -> Exercise {
        serde_json::from_value(value).unwrap()
    }

    fn blanks_exercise() -> Exercise {
        exercise(json!({
            "id": "fb", "type": "fill_in_blanks", "text": "Le ___ miaule.",
            "blanks": [{"id": "b1", "position": 0, "correctAnswer": "chat",
                        "acceptableAnswers": ["félin", "matou"]}]
        }))
    }

    fn qcm_exercise() -> Exercise {
        exercise(json!({
            "id": "q", "type": "qcm", "text": "Choisir",
            "questions": [{"id": "q1", "text": "?", "options": ["A", "B", "C", "D"],
                           "correctAnswers": ["A", "C"], "explanation": "A et C."}],
            "explanation": "Général."
        }))
    }

    fn ordering_exercise() -> Exercise {
        exercise(json!({
            "id": "o", "type": "ordering", "text": "Ordonner",
            "items": [
                {"id": "c", "text": "C", "position": 3},
                {"id": "a", "text": "A", "position": 1},
                {"id": "b", "text": "B", "position": 2}
            ]
        }))
    }

    fn option_blanks_exercise() -> Exercise {
        exercise(json!({
            "id": "fbo", "type": "fill_in_blanks_options", "text": "Nous ___ au parc.",
            "blanks": [{"id": "b1", "position": 0,
                        "options": ["sommes allés", "avons allé", "allons"],
                        "correctAnswer": "sommes allés"}]
        }))
    }

    fn matching_exercise() -> Exercise {
        exercise(json!({
            "id": "m", "type": "matching", "text": "Associer",
            "pairs": [{"id": "p1", "left": "2", "right": "Deux"},
                      {"id": "p2", "left": "1", "right": "Un"},
                      {"id": "p3", "left": "un", "right": "Un"}]
        }))
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fill_in_blanks_folds_case_and_whitespace() {
        let ex = blanks_exercise();
        let check = |answer: &str| {
            grade(&ex, &AnswerSheet::FillInBlanks(vec![answer.to_string()]))
                .unwrap()
                .passed
        };
        assert!(check(" Chat "));
        assert!(check("matou"));
        assert!(check("FÉLIN"));
        assert!(!check("chien"));
        assert!(!check(""));
    }

    #[test]
    fn qcm_requires_exact_set() {
        let ex = qcm_exercise();
        let sheet = |opts: &[u32]| AnswerSheet::Qcm(vec![opts.iter().map(|n| OptionId(*n)).collect()]);
        assert!(grade(&ex, &sheet(&[1, 3])).unwrap().passed);
        assert!(!grade(&ex, &sheet(&[1])).unwrap().passed);

        let v = grade(&ex, &sheet(&[1, 2, 3])).unwrap();
        assert!(!v.passed);
        assert_eq!(v.message, "0 question(s) correcte(s) sur 1.");
    }

    #[test]
    fn ordering_compares_ids_by_position() {
        let ex = ordering_exercise();
        assert!(!grade(&ex, &AnswerSheet::Ordering(ids(&["b", "a", "c"]))).unwrap().passed);
        let v = grade(&ex, &AnswerSheet::Ordering(ids(&["a", "b", "c"]))).unwrap();
        assert!(v.passed);
        assert_eq!(v.correct, 3);
    }

    #[test]
    fn matching_checks_right_value_per_pair() {
        let ex = exercise(json!({
            "id": "m", "type": "matching", "text": "Associer",
            "pairs": [{"id": "p1", "left": "1", "right": "Un"},
                      {"id": "p2", "left": "2", "right": "Deux"}]
        }));
        let mut chosen = BTreeMap::new();
        chosen.insert("p1".to_string(), "Un".to_string());
        chosen.insert("p2".to_string(), "Un".to_string());
        let v = grade(&ex, &AnswerSheet::Matching(chosen)).unwrap();
        assert_eq!(v.elements, vec![true, false]);
        assert_eq!(v.message, "Une ou plusieurs associations sont incorrectes.");
    }

    #[test]
    fn option_blank_needs_the_stored_option() {
        let ex = option_blanks_exercise();
        let pick = |option: Option<u32>| AnswerSheet::FillInBlanksOptions(vec![option.map(OptionId)]);

        let v = grade(&ex, &pick(Some(1))).unwrap();
        assert!(v.passed);
        assert_eq!(v.message, "Tous les trous sont correctement remplis !");

        let v = grade(&ex, &pick(Some(2))).unwrap();
        assert!(!v.passed);
        assert_eq!(v.elements, vec![false]);
        assert_eq!(v.message, "Un ou plusieurs trous sont incorrectement remplis.");

        assert!(!grade(&ex, &pick(None)).unwrap().passed);
        assert!(!grade(&ex, &AnswerSheet::FillInBlanksOptions(vec![])).unwrap().passed);
    }

    #[test]
    fn legacy_types_grade() {
        let single = exercise(json!({
            "id": "s", "type": "multiple_choice", "options": ["3", "4"], "correctAnswer": "4"
        }));
        assert!(grade(&single, &AnswerSheet::MultipleChoice(Some(OptionId(2)))).unwrap().passed);
        assert!(!grade(&single, &AnswerSheet::MultipleChoice(None)).unwrap().passed);

        let multi = exercise(json!({
            "id": "m", "type": "multiple_answers", "options": ["1", "2", "3", "4"],
            "correctAnswers": ["2", "4"]
        }));
        let picked = BTreeSet::from([OptionId(2), OptionId(4)]);
        assert!(grade(&multi, &AnswerSheet::MultipleAnswers(picked)).unwrap().passed);
    }

    #[test]
    fn grading_is_repeatable() {
        let ex = qcm_exercise();
        let sheet = AnswerSheet::Qcm(vec![BTreeSet::from([OptionId(1)])]);
        assert_eq!(grade(&ex, &sheet).unwrap(), grade(&ex, &sheet).unwrap());
    }

    #[test]
    fn mismatched_sheet_is_rejected() {
        let ex = qcm_exercise();
        assert_eq!(
            grade(&ex, &AnswerSheet::Ordering(vec![])),
            Err(GradeError::KindMismatch {
                expected: ExerciseType::Qcm,
                found: ExerciseType::Ordering
            })
        );
    }

    #[test]
    fn answers_from_json_resolve_option_texts() {
        let ex = qcm_exercise();
        let sheet = AnswerSheet::from_json(&ex, &json!([["A", "C"]])).unwrap();
        assert!(grade(&ex, &sheet).unwrap().passed);
        assert_eq!(
            AnswerSheet::from_json(&ex, &json!([["Z"]])),
            Err(GradeError::UnknownOption("Z".into()))
        );
        assert!(AnswerSheet::from_json(&ex, &json!({"a": 1})).is_err());

        let ordering = ordering_exercise();
        assert!(AnswerSheet::from_json(&ordering, &json!(["a", "b"])).is_err());
        let sheet = AnswerSheet::from_json(&ordering, &json!(["a", "b", "c"])).unwrap();
        assert!(grade(&ordering, &sheet).unwrap().passed);

        let blanks = blanks_exercise();
        assert_eq!(
            AnswerSheet::from_json(&blanks, &json!([])).unwrap(),
            AnswerSheet::FillInBlanks(vec![String::new()])
        );
    }

    #[test]
    fn shuffle_never_starts_solved() {
        let items = match ordering_exercise().body {
            ExerciseBody::Ordering { items } => items,
            _ => unreachable!(),
        };
        let solved = solved_order(&items);
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_ne!(shuffled_order(&items, &mut rng), solved);
        }
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(shuffled_order(&items[..1], &mut rng), ids(&["c"]));
    }

    #[test]
    fn drop_inserts_at_target_index() {
        let mut order = ids(&["a", "b", "c", "d"]);
        assert!(move_onto(&mut order, "a", "c"));
        assert_eq!(order, ids(&["b", "c", "a", "d"]));
        assert!(move_onto(&mut order, "d", "b"));
        assert_eq!(order, ids(&["d", "b", "c", "a"]));
        assert!(!move_onto(&mut order, "x", "b"));
    }

    #[test]
    fn session_solves_ordering_by_moves() {
        let ex = ordering_exercise();
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = PreviewSession::new(&ex, &mut rng);
        let solved = ids(&["a", "b", "c"]);

        for (i, id) in solved.iter().enumerate() {
            let AnswerSheet::Ordering(order) = session.answers() else {
                panic!("expected ordering answers");
            };
            if &order[i] != id {
                let target = order[i].clone();
                session.move_item(id, &target).unwrap();
            }
        }
        assert_eq!(session.answers(), &AnswerSheet::Ordering(solved));
        assert!(session.submit().unwrap().passed);
    }

    #[test]
    fn graded_session_is_frozen_until_reset() {
        let ex = blanks_exercise();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = PreviewSession::new(&ex, &mut rng);
        assert_eq!(session.explanation(), None);

        session.fill_blank(0, "Matou").unwrap();
        let verdict = session.submit().unwrap().clone();
        assert!(verdict.passed);
        assert_eq!(session.state(), PreviewState::Graded);
        assert_eq!(session.fill_blank(0, "chien"), Err(PreviewError::Frozen));
        assert_eq!(session.submit().unwrap(), &verdict);

        session.reset(&mut rng);
        assert_eq!(session.state(), PreviewState::Answering);
        assert_eq!(session.answers(), &AnswerSheet::FillInBlanks(vec![String::new()]));
        assert_eq!(session.verdict(), None);
    }

    #[test]
    fn qcm_session_reports_explanations_after_submit() {
        let ex = qcm_exercise();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = PreviewSession::new(&ex, &mut rng);
        session.toggle_option(0, OptionId(1)).unwrap();
        session.toggle_option(0, OptionId(3)).unwrap();
        assert!(session.toggle_option(0, OptionId(9)).is_err());
        assert!(session.fill_blank(0, "x").is_err());
        assert!(session.submit().unwrap().passed);
        assert_eq!(session.explanation(), Some("Général."));
        assert_eq!(session.question_explanation(0), Some("A et C."));
    }

    #[test]
    fn option_blank_session_picks_by_id() {
        let ex = option_blanks_exercise();
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = PreviewSession::new(&ex, &mut rng);
        assert_eq!(session.answers(), &AnswerSheet::FillInBlanksOptions(vec![None]));

        session.choose_blank_option(0, OptionId(2)).unwrap();
        session.choose_blank_option(0, OptionId(1)).unwrap();
        assert!(session.choose_blank_option(0, OptionId(7)).is_err());
        assert!(session.choose_blank_option(3, OptionId(1)).is_err());
        assert!(session.match_pair("p1", "Deux").is_err());

        assert!(session.submit().unwrap().passed);
        assert_eq!(
            session.choose_blank_option(0, OptionId(2)),
            Err(PreviewError::Frozen)
        );
    }

    #[test]
    fn matching_session_offers_sorted_targets() {
        let ex = matching_exercise();
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = PreviewSession::new(&ex, &mut rng);
        assert_eq!(session.matching_targets(), vec!["Deux", "Un"]);

        session.match_pair("p1", "Un").unwrap();
        session.match_pair("p1", "Deux").unwrap();
        session.match_pair("p2", "Un").unwrap();
        assert!(session.match_pair("p9", "Un").is_err());

        let verdict = session.submit().unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.elements, vec![true, true, false]);
        assert_eq!(session.match_pair("p3", "Un"), Err(PreviewError::Frozen));

        session.reset(&mut rng);
        session.match_pair("p1", "Deux").unwrap();
        session.match_pair("p2", "Un").unwrap();
        session.match_pair("p3", "Un").unwrap();
        let verdict = session.submit().unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.message, "Toutes les associations sont correctes !");

        let blanks = blanks_exercise();
        let session = PreviewSession::new(&blanks, &mut rng);
        assert!(session.matching_targets().is_empty());
    }

    #[test]
    fn legacy_sessions_select_options() {
        let single = exercise(json!({
            "id": "s", "type": "multiple_choice", "options": ["3", "4", "5"], "correctAnswer": "4"
        }));
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = PreviewSession::new(&single, &mut rng);
        session.select_legacy(OptionId(1)).unwrap();
        session.select_legacy(OptionId(2)).unwrap();
        assert_eq!(session.answers(), &AnswerSheet::MultipleChoice(Some(OptionId(2))));
        assert!(session.select_legacy(OptionId(8)).is_err());
        assert_eq!(session.submit().unwrap().message, "Bonne réponse !");
        assert_eq!(session.select_legacy(OptionId(3)), Err(PreviewError::Frozen));

        let multi = exercise(json!({
            "id": "m", "type": "multiple_answers", "options": ["1", "2", "3", "4"],
            "correctAnswers": ["2", "4"]
        }));
        let mut session = PreviewSession::new(&multi, &mut rng);
        session.select_legacy(OptionId(2)).unwrap();
        session.select_legacy(OptionId(3)).unwrap();
        session.select_legacy(OptionId(3)).unwrap();
        session.select_legacy(OptionId(4)).unwrap();
        assert_eq!(
            session.answers(),
            &AnswerSheet::MultipleAnswers(BTreeSet::from([OptionId(2), OptionId(4)]))
        );
        assert!(session.submit().unwrap().passed);

        let qcm = qcm_exercise();
        let mut session = PreviewSession::new(&qcm, &mut rng);
        assert!(session.select_legacy(OptionId(1)).is_err());
    }
}
