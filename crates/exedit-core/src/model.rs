//! Core data model types for exedit.
//!
//! An [`Exercise`] carries the metadata every exercise shares plus an
//! [`ExerciseBody`] holding the type-specific payload. Options are given a
//! stable [`OptionId`] when they are created or imported and correctness is
//! tracked by id, so renaming an option never invalidates a correct answer.
//! The JSON wire format still names correct answers by option text; the
//! conversion happens in the `*Record` types at the serde boundary.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Substring marking a blank in a fill-in-the-blanks prompt.
pub const BLANK_MARKER: &str = "___";

/// Image shown in place of a reference that cannot be loaded.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/200x150?text=Image+non+disponible";

/// The kind of an exercise, as written in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Qcm,
    FillInBlanks,
    FillInBlanksOptions,
    Matching,
    Ordering,
    /// Legacy single-answer multiple choice.
    MultipleChoice,
    /// Legacy multiple-answer multiple choice.
    MultipleAnswers,
}

impl ExerciseType {
    /// Every type, current ones first.
    pub const ALL: [ExerciseType; 7] = [
        ExerciseType::Qcm,
        ExerciseType::FillInBlanks,
        ExerciseType::FillInBlanksOptions,
        ExerciseType::Matching,
        ExerciseType::Ordering,
        ExerciseType::MultipleChoice,
        ExerciseType::MultipleAnswers,
    ];

    /// Legacy types are read and graded but never created.
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            ExerciseType::MultipleChoice | ExerciseType::MultipleAnswers
        )
    }

    /// The wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Qcm => "qcm",
            ExerciseType::FillInBlanks => "fill_in_blanks",
            ExerciseType::FillInBlanksOptions => "fill_in_blanks_options",
            ExerciseType::Matching => "matching",
            ExerciseType::Ordering => "ordering",
            ExerciseType::MultipleChoice => "multiple_choice",
            ExerciseType::MultipleAnswers => "multiple_answers",
        }
    }

    /// Label shown to authors.
    pub fn label(self) -> &'static str {
        match self {
            ExerciseType::Qcm => "QCM (une ou plusieurs questions)",
            ExerciseType::FillInBlanks => "Texte à trous",
            ExerciseType::FillInBlanksOptions => "Texte à trous avec options",
            ExerciseType::Matching => "Association",
            ExerciseType::Ordering => "Mise en ordre",
            ExerciseType::MultipleChoice => "QCM (réponse unique)",
            ExerciseType::MultipleAnswers => "QCM (réponses multiples)",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ExerciseType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown exercise type: {s}"))
    }
}

/// Review state of an exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Validated,
    #[default]
    Pending,
}

impl ValidationStatus {
    pub fn toggled(self) -> Self {
        match self {
            ValidationStatus::Validated => ValidationStatus::Pending,
            ValidationStatus::Pending => ValidationStatus::Validated,
        }
    }

    /// Review label shown to authors.
    pub fn label(self) -> &'static str {
        match self {
            ValidationStatus::Validated => "validé",
            ValidationStatus::Pending => "à revoir",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Validated => write!(f, "validated"),
            ValidationStatus::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for ValidationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "validated" => Ok(ValidationStatus::Validated),
            "pending" => Ok(ValidationStatus::Pending),
            other => Err(format!("unknown validation status: {other}")),
        }
    }
}

/// Stable identifier of an option within its owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(pub u32);

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: OptionId,
    pub text: String,
    pub image: Option<String>,
}

/// The id a new option appended to `choices` should get.
pub fn next_option_id(choices: &[Choice]) -> OptionId {
    OptionId(choices.iter().map(|c| c.id.0).max().unwrap_or(0) + 1)
}

/// Build a choice list from parallel text and image lists.
pub fn choices_from_texts(texts: Vec<String>, images: Vec<Option<String>>) -> Vec<Choice> {
    let mut images = images.into_iter();
    texts
        .into_iter()
        .zip(1u32..)
        .map(|(text, n)| Choice {
            id: OptionId(n),
            text,
            image: images.next().flatten().filter(|url| !url.trim().is_empty()),
        })
        .collect()
}

/// `Option 1` … `Option n`.
pub fn default_choices(n: u32) -> Vec<Choice> {
    choices_from_texts((1..=n).map(|i| format!("Option {i}")).collect(), vec![])
}

/// First choice whose text is exactly `text`.
pub fn find_choice(choices: &[Choice], text: &str) -> Option<OptionId> {
    choices.iter().find(|c| c.text == text).map(|c| c.id)
}

pub fn choice_text(choices: &[Choice], id: OptionId) -> Option<&str> {
    choices
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.text.as_str())
}

fn resolve_correct<'a>(
    choices: &[Choice],
    texts: impl IntoIterator<Item = &'a String>,
) -> BTreeSet<OptionId> {
    texts
        .into_iter()
        .filter_map(|text| {
            let id = find_choice(choices, text);
            if id.is_none() {
                tracing::warn!("dropping correct answer {text:?}: no option has that text");
            }
            id
        })
        .collect()
}

fn correct_texts(choices: &[Choice], correct: &BTreeSet<OptionId>) -> Vec<String> {
    choices
        .iter()
        .filter(|c| correct.contains(&c.id))
        .map(|c| c.text.clone())
        .collect()
}

/// A single exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Unique identifier.
    pub id: String,
    /// Prompt text; may embed `$…$` math markup and blank markers.
    #[serde(default, deserialize_with = "or_default")]
    pub text: String,
    #[serde(default, deserialize_with = "image_slot")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "status_field")]
    pub validation_status: ValidationStatus,
    #[serde(default, deserialize_with = "or_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "or_default")]
    pub level: String,
    #[serde(default, deserialize_with = "or_default")]
    pub concept_name: String,
    /// Positive exercise number within its concept.
    #[serde(default = "default_exercise_number", deserialize_with = "exercise_number")]
    pub exercise_number: u32,
    /// Type tag and type-specific payload.
    #[serde(flatten)]
    pub body: ExerciseBody,
}

impl Exercise {
    pub fn kind(&self) -> ExerciseType {
        self.body.kind()
    }

    pub fn is_validated(&self) -> bool {
        self.validation_status == ValidationStatus::Validated
    }
}

/// Type-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseBody {
    Qcm {
        #[serde(default)]
        questions: Vec<Question>,
    },
    FillInBlanks {
        #[serde(default)]
        blanks: Vec<TextBlank>,
    },
    FillInBlanksOptions {
        #[serde(default)]
        blanks: Vec<ChoiceBlank>,
    },
    Matching {
        #[serde(default)]
        pairs: Vec<Pair>,
    },
    Ordering {
        #[serde(default)]
        items: Vec<OrderItem>,
    },
    MultipleChoice(SingleChoice),
    MultipleAnswers(MultiChoice),
}

impl ExerciseBody {
    pub fn kind(&self) -> ExerciseType {
        match self {
            ExerciseBody::Qcm { .. } => ExerciseType::Qcm,
            ExerciseBody::FillInBlanks { .. } => ExerciseType::FillInBlanks,
            ExerciseBody::FillInBlanksOptions { .. } => ExerciseType::FillInBlanksOptions,
            ExerciseBody::Matching { .. } => ExerciseType::Matching,
            ExerciseBody::Ordering { .. } => ExerciseType::Ordering,
            ExerciseBody::MultipleChoice(_) => ExerciseType::MultipleChoice,
            ExerciseBody::MultipleAnswers(_) => ExerciseType::MultipleAnswers,
        }
    }
}

/// One question of a `qcm` exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub image: Option<String>,
    pub choices: Vec<Choice>,
    pub correct: BTreeSet<OptionId>,
    pub explanation: String,
}

impl Question {
    /// A fresh question with four options, the first one correct.
    pub fn template(id: String) -> Self {
        Self {
            id,
            text: "Nouvelle question".into(),
            image: None,
            choices: default_choices(4),
            correct: BTreeSet::from([OptionId(1)]),
            explanation: "Explication de la réponse correcte.".into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default, deserialize_with = "or_default")]
    id: String,
    #[serde(default, deserialize_with = "or_default")]
    text: String,
    #[serde(default, deserialize_with = "image_slot")]
    image: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    option_images: Vec<Option<String>>,
    #[serde(default, deserialize_with = "or_default")]
    correct_answers: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    explanation: String,
}

impl From<QuestionRecord> for Question {
    fn from(r: QuestionRecord) -> Self {
        let choices = choices_from_texts(r.options, r.option_images);
        let correct = resolve_correct(&choices, &r.correct_answers);
        Self {
            id: r.id,
            text: r.text,
            image: r.image,
            choices,
            correct,
            explanation: r.explanation,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        let correct_answers = correct_texts(&q.choices, &q.correct);
        let (options, option_images): (Vec<String>, Vec<Option<String>>) =
            q.choices.into_iter().map(|c| (c.text, c.image)).unzip();
        Self {
            id: q.id,
            text: q.text,
            image: q.image,
            options,
            option_images,
            correct_answers,
            explanation: q.explanation,
        }
    }
}

/// A free-text blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlank {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    /// Zero-based index into the blank markers of the prompt.
    #[serde(default)]
    pub position: usize,
    #[serde(default, deserialize_with = "or_default")]
    pub correct_answer: String,
    #[serde(default, deserialize_with = "or_default")]
    pub acceptable_answers: Vec<String>,
}

/// A blank answered by picking one of a fixed set of options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChoiceBlankRecord", into = "ChoiceBlankRecord")]
pub struct ChoiceBlank {
    pub id: String,
    pub position: usize,
    pub choices: Vec<Choice>,
    pub correct: Option<OptionId>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChoiceBlankRecord {
    #[serde(default, deserialize_with = "or_default")]
    id: String,
    #[serde(default)]
    position: usize,
    #[serde(default, deserialize_with = "or_default")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    correct_answer: String,
}

impl From<ChoiceBlankRecord> for ChoiceBlank {
    fn from(r: ChoiceBlankRecord) -> Self {
        let choices = choices_from_texts(r.options, vec![]);
        let correct = resolve_correct(&choices, [&r.correct_answer]).into_iter().next();
        Self {
            id: r.id,
            position: r.position,
            choices,
            correct,
        }
    }
}

impl From<ChoiceBlank> for ChoiceBlankRecord {
    fn from(b: ChoiceBlank) -> Self {
        let correct_answer = b
            .correct
            .and_then(|id| choice_text(&b.choices, id))
            .unwrap_or_default()
            .to_string();
        Self {
            id: b.id,
            position: b.position,
            options: b.choices.into_iter().map(|c| c.text).collect(),
            correct_answer,
        }
    }
}

/// A left/right pair of a matching exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub left: String,
    #[serde(default, deserialize_with = "or_default")]
    pub right: String,
    #[serde(default, deserialize_with = "image_slot")]
    pub left_image: Option<String>,
    #[serde(default, deserialize_with = "image_slot")]
    pub right_image: Option<String>,
}

/// An item of an ordering exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub text: String,
    /// One-based target position.
    #[serde(default)]
    pub position: u32,
    #[serde(default, deserialize_with = "image_slot")]
    pub image: Option<String>,
}

/// Payload of a legacy `multiple_choice` exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SingleChoiceRecord", into = "SingleChoiceRecord")]
pub struct SingleChoice {
    pub choices: Vec<Choice>,
    pub correct: Option<OptionId>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SingleChoiceRecord {
    #[serde(default, deserialize_with = "or_default")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    correct_answer: String,
}

impl From<SingleChoiceRecord> for SingleChoice {
    fn from(r: SingleChoiceRecord) -> Self {
        let choices = choices_from_texts(r.options, vec![]);
        let correct = resolve_correct(&choices, [&r.correct_answer]).into_iter().next();
        Self { choices, correct }
    }
}

impl From<SingleChoice> for SingleChoiceRecord {
    fn from(s: SingleChoice) -> Self {
        let correct_answer = s
            .correct
            .and_then(|id| choice_text(&s.choices, id))
            .unwrap_or_default()
            .to_string();
        Self {
            options: s.choices.into_iter().map(|c| c.text).collect(),
            correct_answer,
        }
    }
}

/// Payload of a legacy `multiple_answers` exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MultiChoiceRecord", into = "MultiChoiceRecord")]
pub struct MultiChoice {
    pub choices: Vec<Choice>,
    pub correct: BTreeSet<OptionId>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiChoiceRecord {
    #[serde(default, deserialize_with = "or_default")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "or_default")]
    correct_answers: Vec<String>,
}

impl From<MultiChoiceRecord> for MultiChoice {
    fn from(r: MultiChoiceRecord) -> Self {
        let choices = choices_from_texts(r.options, vec![]);
        let correct = resolve_correct(&choices, &r.correct_answers);
        Self { choices, correct }
    }
}

impl From<MultiChoice> for MultiChoiceRecord {
    fn from(m: MultiChoice) -> Self {
        Self {
            correct_answers: correct_texts(&m.choices, &m.correct),
            options: m.choices.into_iter().map(|c| c.text).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field readers
// ---------------------------------------------------------------------------

/// Treat `null` like a missing field.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Image slots are absent when `null` or blank.
fn image_slot<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|url| !url.trim().is_empty()))
}

/// Anything other than `"validated"` counts as pending.
fn status_field<'de, D>(deserializer: D) -> Result<ValidationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<String>::deserialize(deserializer)?.as_deref() {
        Some("validated") => ValidationStatus::Validated,
        _ => ValidationStatus::Pending,
    })
}

fn exercise_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|n| *n > 0)
        .unwrap_or_else(default_exercise_number))
}

fn default_exercise_number() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qcm_json() -> serde_json::Value {
        serde_json::json!({
            "id": "ex-1",
            "type": "qcm",
            "text": "Capitales",
            "questions": [{
                "id": "q-1",
                "text": "Capitale de la France ?",
                "options": ["Lyon", "Paris", "Nice"],
                "optionImages": [null, "", "https://img/nice.png"],
                "correctAnswers": ["Paris"],
                "explanation": "Paris."
            }],
            "validationStatus": "validated",
            "exerciseNumber": 3
        })
    }

    #[test]
    fn exercise_type_display_and_parse() {
        assert_eq!(ExerciseType::FillInBlanksOptions.to_string(), "fill_in_blanks_options");
        assert_eq!("qcm".parse::<ExerciseType>().unwrap(), ExerciseType::Qcm);
        assert_eq!(
            "fill-in-blanks".parse::<ExerciseType>().unwrap(),
            ExerciseType::FillInBlanks
        );
        assert!("essay".parse::<ExerciseType>().is_err());
        assert!(ExerciseType::MultipleAnswers.is_legacy());
        assert!(!ExerciseType::Ordering.is_legacy());
    }

    #[test]
    fn qcm_correct_answers_resolve_to_ids() {
        let ex: Exercise = serde_json::from_value(qcm_json()).unwrap();
        assert_eq!(ex.kind(), ExerciseType::Qcm);
        assert!(ex.is_validated());
        assert_eq!(ex.exercise_number, 3);
        let ExerciseBody::Qcm { questions } = &ex.body else {
            panic!("expected qcm body");
        };
        let q = &questions[0];
        assert_eq!(q.choices.len(), 3);
        assert_eq!(q.correct, BTreeSet::from([OptionId(2)]));
        assert_eq!(q.choices[0].image, None);
        assert_eq!(q.choices[1].image, None);
        assert_eq!(q.choices[2].image.as_deref(), Some("https://img/nice.png"));
    }

    #[test]
    fn serialization_writes_correct_answers_by_text() {
        let ex: Exercise = serde_json::from_value(qcm_json()).unwrap();
        let value = serde_json::to_value(&ex).unwrap();
        assert_eq!(value["type"], "qcm");
        assert_eq!(value["validationStatus"], "validated");
        assert_eq!(value["questions"][0]["correctAnswers"], serde_json::json!(["Paris"]));
        assert_eq!(value["questions"][0]["optionImages"][2], "https://img/nice.png");
    }

    #[test]
    fn missing_metadata_gets_defaults() {
        let ex: Exercise = serde_json::from_value(serde_json::json!({
            "id": "ex-2",
            "type": "ordering",
            "text": "Ordre",
            "subject": null,
            "exerciseNumber": 0,
            "validationStatus": "draft",
            "items": [
                {"id": "a", "text": "A", "position": 1},
                {"id": "b", "text": "B", "position": 2, "image": ""}
            ]
        }))
        .unwrap();
        assert_eq!(ex.validation_status, ValidationStatus::Pending);
        assert_eq!(ex.subject, "");
        assert_eq!(ex.level, "");
        assert_eq!(ex.concept_name, "");
        assert_eq!(ex.exercise_number, 1);
        let ExerciseBody::Ordering { items } = &ex.body else {
            panic!("expected ordering body");
        };
        assert_eq!(items[1].image, None);
    }

    #[test]
    fn legacy_multiple_choice_reads_single_answer() {
        let ex: Exercise = serde_json::from_value(serde_json::json!({
            "id": "old",
            "type": "multiple_choice",
            "text": "2 + 2 ?",
            "options": ["3", "4"],
            "correctAnswer": "4"
        }))
        .unwrap();
        let ExerciseBody::MultipleChoice(single) = &ex.body else {
            panic!("expected legacy body");
        };
        assert_eq!(single.correct, Some(OptionId(2)));
        let value = serde_json::to_value(&ex).unwrap();
        assert_eq!(value["type"], "multiple_choice");
        assert_eq!(value["correctAnswer"], "4");
    }

    #[test]
    fn unmatched_correct_answer_is_dropped() {
        let blank: ChoiceBlank = serde_json::from_value(serde_json::json!({
            "id": "b",
            "position": 0,
            "options": ["chat", "chien"],
            "correctAnswer": "souris"
        }))
        .unwrap();
        assert_eq!(blank.correct, None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<Exercise, _> =
            serde_json::from_value(serde_json::json!({"id": "x", "type": "essay"}));
        assert!(result.is_err());
    }

    #[test]
    fn next_option_id_skips_past_highest() {
        let mut choices = default_choices(3);
        choices.remove(1);
        assert_eq!(next_option_id(&choices), OptionId(4));
        assert_eq!(next_option_id(&[]), OptionId(1));
    }
}
