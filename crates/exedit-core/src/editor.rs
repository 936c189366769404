//! Form editor.
//!
//! An [`ExerciseDraft`] is a working copy of one exercise. Field edits only
//! touch the draft; [`ExerciseDraft::save`] writes the whole record back to
//! the store. Options are addressed by [`OptionId`], so renaming an option
//! never disturbs which options are marked correct.

use std::collections::BTreeSet;

use crate::error::{EditError, StoreError};
use crate::model::{
    default_choices, next_option_id, Choice, ChoiceBlank, Exercise, ExerciseBody, OptionId,
    OrderItem, Pair, Question, TextBlank, ValidationStatus,
};
use crate::store::ExerciseStore;
use crate::traits::IdSource;

/// Fewest options any option list may have.
pub const MIN_OPTIONS: usize = 2;
/// Fewest questions a `qcm` exercise may have.
pub const MIN_QUESTIONS: usize = 1;
/// Fewest blanks a fill-in-the-blanks exercise may have.
pub const MIN_BLANKS: usize = 1;
/// Fewest pairs a matching exercise may have.
pub const MIN_PAIRS: usize = 2;
/// Fewest items an ordering exercise may have.
pub const MIN_ITEMS: usize = 2;

/// Which option list an option operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceList {
    /// Options of the `qcm` question at this index.
    Question(usize),
    /// Options of the `fill_in_blanks_options` blank at this index.
    Blank(usize),
    /// Top-level options of a legacy exercise.
    Legacy,
}

/// Side of a matching pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

enum CorrectMut<'a> {
    Many(&'a mut BTreeSet<OptionId>),
    One(&'a mut Option<OptionId>),
}

fn entry<'a, T>(list: &'a mut [T], index: usize, what: &'static str) -> Result<&'a mut T, EditError> {
    list.get_mut(index)
        .ok_or(EditError::OutOfRange { what, index })
}

fn ensure_above(len: usize, min: usize, what: &'static str) -> Result<(), EditError> {
    if len <= min {
        Err(EditError::BelowMinimum { what, min })
    } else {
        Ok(())
    }
}

fn image_value(image: Option<String>) -> Option<String> {
    image.filter(|url| !url.trim().is_empty())
}

/// Working copy of an exercise being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    exercise: Exercise,
}

impl ExerciseDraft {
    pub fn new(exercise: Exercise) -> Self {
        Self { exercise }
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn into_exercise(self) -> Exercise {
        self.exercise
    }

    /// Replace the stored record with this draft.
    pub fn save(&self, store: &mut ExerciseStore) -> Result<(), StoreError> {
        store.update(self.exercise.clone())
    }

    // -----------------------------------------------------------------------
    // Common fields
    // -----------------------------------------------------------------------

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.exercise.text = text.into();
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.exercise.image = image_value(image);
    }

    pub fn set_explanation(&mut self, explanation: impl Into<String>) {
        self.exercise.explanation = explanation.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.exercise.subject = subject.into();
    }

    pub fn set_level(&mut self, level: impl Into<String>) {
        self.exercise.level = level.into();
    }

    pub fn set_concept_name(&mut self, concept_name: impl Into<String>) {
        self.exercise.concept_name = concept_name.into();
    }

    /// Exercise numbers are positive; zero becomes one.
    pub fn set_exercise_number(&mut self, number: u32) {
        self.exercise.exercise_number = number.max(1);
    }

    pub fn set_status(&mut self, status: ValidationStatus) {
        self.exercise.validation_status = status;
    }

    // -----------------------------------------------------------------------
    // Payload accessors
    // -----------------------------------------------------------------------

    fn questions(&mut self, operation: &'static str) -> Result<&mut Vec<Question>, EditError> {
        let kind = self.exercise.kind();
        match &mut self.exercise.body {
            ExerciseBody::Qcm { questions } => Ok(questions),
            _ => Err(EditError::WrongKind { operation, kind }),
        }
    }

    fn text_blanks(&mut self, operation: &'static str) -> Result<&mut Vec<TextBlank>, EditError> {
        let kind = self.exercise.kind();
        match &mut self.exercise.body {
            ExerciseBody::FillInBlanks { blanks } => Ok(blanks),
            _ => Err(EditError::WrongKind { operation, kind }),
        }
    }

    fn pairs(&mut self, operation: &'static str) -> Result<&mut Vec<Pair>, EditError> {
        let kind = self.exercise.kind();
        match &mut self.exercise.body {
            ExerciseBody::Matching { pairs } => Ok(pairs),
            _ => Err(EditError::WrongKind { operation, kind }),
        }
    }

    fn items(&mut self, operation: &'static str) -> Result<&mut Vec<OrderItem>, EditError> {
        let kind = self.exercise.kind();
        match &mut self.exercise.body {
            ExerciseBody::Ordering { items } => Ok(items),
            _ => Err(EditError::WrongKind { operation, kind }),
        }
    }

    fn choice_list(
        &mut self,
        list: ChoiceList,
        operation: &'static str,
    ) -> Result<(&mut Vec<Choice>, CorrectMut<'_>), EditError> {
        let kind = self.exercise.kind();
        match (list, &mut self.exercise.body) {
            (ChoiceList::Question(index), ExerciseBody::Qcm { questions }) => {
                let q = entry(questions, index, "question")?;
                Ok((&mut q.choices, CorrectMut::Many(&mut q.correct)))
            }
            (ChoiceList::Blank(index), ExerciseBody::FillInBlanksOptions { blanks }) => {
                let b = entry(blanks, index, "blank")?;
                Ok((&mut b.choices, CorrectMut::One(&mut b.correct)))
            }
            (ChoiceList::Legacy, ExerciseBody::MultipleChoice(single)) => {
                Ok((&mut single.choices, CorrectMut::One(&mut single.correct)))
            }
            (ChoiceList::Legacy, ExerciseBody::MultipleAnswers(multi)) => {
                Ok((&mut multi.choices, CorrectMut::Many(&mut multi.correct)))
            }
            _ => Err(EditError::WrongKind { operation, kind }),
        }
    }

    // -----------------------------------------------------------------------
    // Options (qcm questions, option blanks, legacy lists)
    // -----------------------------------------------------------------------

    /// Append `Option N` and return its id.
    ///
    /// `N` starts at the new list length and skips labels already taken, so
    /// option texts stay unique within the list.
    pub fn add_option(&mut self, list: ChoiceList) -> Result<OptionId, EditError> {
        let (choices, _) = self.choice_list(list, "add option")?;
        let id = next_option_id(choices);
        let text = (choices.len() + 1..)
            .map(|n| format!("Option {n}"))
            .find(|label| !choices.iter().any(|c| &c.text == label))
            .unwrap_or_default();
        choices.push(Choice {
            id,
            text,
            image: None,
        });
        Ok(id)
    }

    /// Remove an option, keeping at least [`MIN_OPTIONS`].
    ///
    /// A removed correct option leaves a multi-answer set; for single-answer
    /// lists the first remaining option becomes correct.
    pub fn remove_option(&mut self, list: ChoiceList, option: OptionId) -> Result<(), EditError> {
        let (choices, correct) = self.choice_list(list, "remove option")?;
        let idx = choices
            .iter()
            .position(|c| c.id == option)
            .ok_or(EditError::UnknownOption(option))?;
        ensure_above(choices.len(), MIN_OPTIONS, "option")?;
        choices.remove(idx);

        match correct {
            CorrectMut::Many(set) => {
                set.remove(&option);
            }
            CorrectMut::One(slot) => {
                if *slot == Some(option) {
                    *slot = choices.first().map(|c| c.id);
                }
            }
        }
        Ok(())
    }

    /// Change an option's text. Correctness follows the option, not the text.
    ///
    /// Texts must stay unique within a list: correct answers are saved by text.
    pub fn rename_option(
        &mut self,
        list: ChoiceList,
        option: OptionId,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        let text = text.into();
        let (choices, _) = self.choice_list(list, "rename option")?;
        if choices.iter().any(|c| c.id != option && c.text == text) {
            return Err(EditError::DuplicateOption(text));
        }
        let choice = choices
            .iter_mut()
            .find(|c| c.id == option)
            .ok_or(EditError::UnknownOption(option))?;
        choice.text = text;
        Ok(())
    }

    /// Only `qcm` options carry images.
    pub fn set_option_image(
        &mut self,
        question: usize,
        option: OptionId,
        image: Option<String>,
    ) -> Result<(), EditError> {
        let q = entry(self.questions("set option image")?, question, "question")?;
        let choice = q
            .choices
            .iter_mut()
            .find(|c| c.id == option)
            .ok_or(EditError::UnknownOption(option))?;
        choice.image = image_value(image);
        Ok(())
    }

    /// Flip an option's correctness and return whether it is now correct.
    ///
    /// Single-answer lists always end with exactly this option correct.
    pub fn toggle_correct(&mut self, list: ChoiceList, option: OptionId) -> Result<bool, EditError> {
        let (choices, correct) = self.choice_list(list, "toggle correct answer")?;
        if !choices.iter().any(|c| c.id == option) {
            return Err(EditError::UnknownOption(option));
        }
        Ok(match correct {
            CorrectMut::Many(set) => {
                if !set.remove(&option) {
                    set.insert(option);
                    true
                } else {
                    false
                }
            }
            CorrectMut::One(slot) => {
                *slot = Some(option);
                true
            }
        })
    }

    // -----------------------------------------------------------------------
    // qcm questions
    // -----------------------------------------------------------------------

    /// Append a template question and return its index.
    pub fn add_question(&mut self, ids: &mut dyn IdSource) -> Result<usize, EditError> {
        let questions = self.questions("add question")?;
        questions.push(Question::template(ids.next_id("q")));
        Ok(questions.len() - 1)
    }

    pub fn remove_question(&mut self, index: usize) -> Result<(), EditError> {
        let questions = self.questions("remove question")?;
        entry(questions, index, "question")?;
        ensure_above(questions.len(), MIN_QUESTIONS, "question")?;
        questions.remove(index);
        Ok(())
    }

    pub fn set_question_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        entry(self.questions("set question text")?, index, "question")?.text = text.into();
        Ok(())
    }

    pub fn set_question_image(&mut self, index: usize, image: Option<String>) -> Result<(), EditError> {
        entry(self.questions("set question image")?, index, "question")?.image = image_value(image);
        Ok(())
    }

    pub fn set_question_explanation(
        &mut self,
        index: usize,
        explanation: impl Into<String>,
    ) -> Result<(), EditError> {
        entry(self.questions("set question explanation")?, index, "question")?.explanation =
            explanation.into();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Blanks
    // -----------------------------------------------------------------------

    /// Append a blank at the next position and return its index.
    pub fn add_blank(&mut self, ids: &mut dyn IdSource) -> Result<usize, EditError> {
        let kind = self.exercise.kind();
        let id = ids.next_id("blank");
        match &mut self.exercise.body {
            ExerciseBody::FillInBlanks { blanks } => {
                blanks.push(TextBlank {
                    id,
                    position: blanks.len(),
                    correct_answer: String::new(),
                    acceptable_answers: Vec::new(),
                });
                Ok(blanks.len() - 1)
            }
            ExerciseBody::FillInBlanksOptions { blanks } => {
                blanks.push(ChoiceBlank {
                    id,
                    position: blanks.len(),
                    choices: default_choices(4),
                    correct: Some(OptionId(1)),
                });
                Ok(blanks.len() - 1)
            }
            _ => Err(EditError::WrongKind {
                operation: "add blank",
                kind,
            }),
        }
    }

    /// Remove a blank; the remaining blanks are renumbered by index.
    pub fn remove_blank(&mut self, index: usize) -> Result<(), EditError> {
        let kind = self.exercise.kind();
        match &mut self.exercise.body {
            ExerciseBody::FillInBlanks { blanks } => {
                entry(blanks, index, "blank")?;
                ensure_above(blanks.len(), MIN_BLANKS, "blank")?;
                blanks.remove(index);
                for (i, blank) in blanks.iter_mut().enumerate() {
                    blank.position = i;
                }
                Ok(())
            }
            ExerciseBody::FillInBlanksOptions { blanks } => {
                entry(blanks, index, "blank")?;
                ensure_above(blanks.len(), MIN_BLANKS, "blank")?;
                blanks.remove(index);
                for (i, blank) in blanks.iter_mut().enumerate() {
                    blank.position = i;
                }
                Ok(())
            }
            _ => Err(EditError::WrongKind {
                operation: "remove blank",
                kind,
            }),
        }
    }

    pub fn set_blank_answer(&mut self, index: usize, answer: impl Into<String>) -> Result<(), EditError> {
        entry(self.text_blanks("set blank answer")?, index, "blank")?.correct_answer = answer.into();
        Ok(())
    }

    /// Append an empty alternative and return its index.
    pub fn add_alternative(&mut self, index: usize) -> Result<usize, EditError> {
        let blank = entry(self.text_blanks("add alternative")?, index, "blank")?;
        blank.acceptable_answers.push(String::new());
        Ok(blank.acceptable_answers.len() - 1)
    }

    pub fn set_alternative(
        &mut self,
        index: usize,
        alternative: usize,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let blank = entry(self.text_blanks("set alternative")?, index, "blank")?;
        *entry(&mut blank.acceptable_answers, alternative, "alternative")? = value.into();
        Ok(())
    }

    pub fn remove_alternative(&mut self, index: usize, alternative: usize) -> Result<(), EditError> {
        let blank = entry(self.text_blanks("remove alternative")?, index, "blank")?;
        entry(&mut blank.acceptable_answers, alternative, "alternative")?;
        blank.acceptable_answers.remove(alternative);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Matching pairs
    // -----------------------------------------------------------------------

    pub fn add_pair(&mut self, ids: &mut dyn IdSource) -> Result<usize, EditError> {
        let id = ids.next_id("pair");
        let pairs = self.pairs("add pair")?;
        let n = pairs.len() + 1;
        pairs.push(Pair {
            id,
            left: format!("Élément {n}"),
            right: format!("Correspondance {n}"),
            left_image: None,
            right_image: None,
        });
        Ok(pairs.len() - 1)
    }

    pub fn remove_pair(&mut self, index: usize) -> Result<(), EditError> {
        let pairs = self.pairs("remove pair")?;
        entry(pairs, index, "pair")?;
        ensure_above(pairs.len(), MIN_PAIRS, "pair")?;
        pairs.remove(index);
        Ok(())
    }

    pub fn set_pair_text(
        &mut self,
        index: usize,
        side: Side,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        let pair = entry(self.pairs("set pair text")?, index, "pair")?;
        match side {
            Side::Left => pair.left = text.into(),
            Side::Right => pair.right = text.into(),
        }
        Ok(())
    }

    pub fn set_pair_image(
        &mut self,
        index: usize,
        side: Side,
        image: Option<String>,
    ) -> Result<(), EditError> {
        let pair = entry(self.pairs("set pair image")?, index, "pair")?;
        match side {
            Side::Left => pair.left_image = image_value(image),
            Side::Right => pair.right_image = image_value(image),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ordering items
    // -----------------------------------------------------------------------

    /// Append `Étape N` at the last position and return its index.
    pub fn add_item(&mut self, ids: &mut dyn IdSource) -> Result<usize, EditError> {
        let id = ids.next_id("item");
        let items = self.items("add item")?;
        let n = items.len() + 1;
        items.push(OrderItem {
            id,
            text: format!("Étape {n}"),
            position: n as u32,
            image: None,
        });
        Ok(items.len() - 1)
    }

    /// Remove an item; items placed after it move up one position.
    pub fn remove_item(&mut self, index: usize) -> Result<(), EditError> {
        let items = self.items("remove item")?;
        let removed_position = entry(items, index, "item")?.position;
        ensure_above(items.len(), MIN_ITEMS, "item")?;
        items.remove(index);
        for item in items.iter_mut() {
            if item.position > removed_position {
                item.position -= 1;
            }
        }
        Ok(())
    }

    pub fn set_item_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        entry(self.items("set item text")?, index, "item")?.text = text.into();
        Ok(())
    }

    pub fn set_item_position(&mut self, index: usize, position: u32) -> Result<(), EditError> {
        entry(self.items("set item position")?, index, "item")?.position = position;
        Ok(())
    }

    pub fn set_item_image(&mut self, index: usize, image: Option<String>) -> Result<(), EditError> {
        entry(self.items("set item image")?, index, "item")?.image = image_value(image);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{choice_text, ExerciseType};
    use crate::traits::SequentialIds;

    fn draft(kind: ExerciseType) -> (ExerciseStore, ExerciseDraft, SequentialIds) {
        let mut store = ExerciseStore::new();
        let mut ids = SequentialIds::new();
        let exercise = store.create(kind, &mut ids).unwrap().clone();
        (store, ExerciseDraft::new(exercise), ids)
    }

    fn first_question(d: &ExerciseDraft) -> &Question {
        match &d.exercise().body {
            ExerciseBody::Qcm { questions } => &questions[0],
            other => panic!("expected qcm, got {:?}", other.kind()),
        }
    }

    #[test]
    fn renaming_correct_option_keeps_it_correct() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let q = first_question(&d);
        assert_eq!(choice_text(&q.choices, OptionId(1)), Some("Option 1"));
        assert!(q.correct.contains(&OptionId(1)));

        d.rename_option(ChoiceList::Question(0), OptionId(1), "Paris").unwrap();

        let q = first_question(&d);
        assert_eq!(choice_text(&q.choices, OptionId(1)), Some("Paris"));
        assert_eq!(q.correct, BTreeSet::from([OptionId(1)]));
        let json = serde_json::to_value(d.exercise()).unwrap();
        assert_eq!(json["questions"][0]["correctAnswers"], serde_json::json!(["Paris"]));
        assert!(!json.to_string().contains("\"Option 1\""));
    }

    #[test]
    fn option_removal_stops_at_two() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        d.remove_option(list, OptionId(1)).unwrap();
        d.remove_option(list, OptionId(2)).unwrap();
        assert_eq!(
            d.remove_option(list, OptionId(3)),
            Err(EditError::BelowMinimum {
                what: "option",
                min: MIN_OPTIONS
            })
        );
        let q = first_question(&d);
        assert_eq!(q.choices.len(), 2);
        assert!(q.correct.is_empty());
    }

    #[test]
    fn added_options_get_fresh_ids_and_labels() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        d.remove_option(list, OptionId(4)).unwrap();
        let id = d.add_option(list).unwrap();
        assert_eq!(id, OptionId(4));
        let id = d.add_option(list).unwrap();
        assert_eq!(id, OptionId(5));
        let q = first_question(&d);
        assert_eq!(q.choices.last().unwrap().text, "Option 5");
    }

    #[test]
    fn added_labels_skip_texts_still_in_use() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        d.add_option(list).unwrap();
        d.remove_option(list, OptionId(1)).unwrap();
        let id = d.add_option(list).unwrap();
        assert_eq!(id, OptionId(6));
        let q = first_question(&d);
        assert_eq!(choice_text(&q.choices, OptionId(5)), Some("Option 5"));
        assert_eq!(choice_text(&q.choices, OptionId(6)), Some("Option 6"));
    }

    #[test]
    fn rename_refuses_a_sibling_text() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        assert_eq!(
            d.rename_option(list, OptionId(2), "Option 1"),
            Err(EditError::DuplicateOption("Option 1".into()))
        );
        assert_eq!(choice_text(&first_question(&d).choices, OptionId(2)), Some("Option 2"));
        // Renaming an option to its own text is fine.
        d.rename_option(list, OptionId(2), "Option 2").unwrap();
    }

    #[test]
    fn correct_option_survives_save_and_reload() {
        use crate::grader::{grade, AnswerSheet};

        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        d.add_option(list).unwrap();
        d.remove_option(list, OptionId(1)).unwrap();
        let added = d.add_option(list).unwrap();
        d.toggle_correct(list, added).unwrap();

        let answers = serde_json::json!([["Option 6"]]);
        let before = AnswerSheet::from_json(d.exercise(), &answers).unwrap();
        assert!(grade(d.exercise(), &before).unwrap().passed);

        let json = serde_json::to_string(d.exercise()).unwrap();
        let reloaded: Exercise = serde_json::from_str(&json).unwrap();
        let ExerciseBody::Qcm { questions } = &reloaded.body else {
            panic!("expected qcm");
        };
        let correct: Vec<_> = questions[0]
            .correct
            .iter()
            .filter_map(|id| choice_text(&questions[0].choices, *id))
            .collect();
        assert_eq!(correct, vec!["Option 6"]);

        let after = AnswerSheet::from_json(&reloaded, &answers).unwrap();
        let verdict = grade(&reloaded, &after).unwrap();
        assert!(verdict.passed, "{}", verdict.message);
    }

    #[test]
    fn toggle_correct_flips_membership() {
        let (_, mut d, _) = draft(ExerciseType::Qcm);
        let list = ChoiceList::Question(0);
        assert!(d.toggle_correct(list, OptionId(3)).unwrap());
        assert!(!d.toggle_correct(list, OptionId(1)).unwrap());
        assert_eq!(first_question(&d).correct, BTreeSet::from([OptionId(3)]));
        assert_eq!(
            d.toggle_correct(list, OptionId(9)),
            Err(EditError::UnknownOption(OptionId(9)))
        );
    }

    #[test]
    fn removing_correct_blank_option_promotes_first_remaining() {
        let (_, mut d, _) = draft(ExerciseType::FillInBlanksOptions);
        let list = ChoiceList::Blank(0);
        d.remove_option(list, OptionId(1)).unwrap();
        let ExerciseBody::FillInBlanksOptions { blanks } = &d.exercise().body else {
            panic!("expected option blanks");
        };
        assert_eq!(blanks[0].correct, Some(OptionId(2)));
        assert_eq!(choice_text(&blanks[0].choices, OptionId(2)), Some("chien"));
    }

    #[test]
    fn blanks_are_renumbered_after_removal() {
        let (_, mut d, mut ids) = draft(ExerciseType::FillInBlanks);
        d.add_blank(&mut ids).unwrap();
        d.add_blank(&mut ids).unwrap();
        d.remove_blank(0).unwrap();
        let ExerciseBody::FillInBlanks { blanks } = &d.exercise().body else {
            panic!("expected blanks");
        };
        assert_eq!(blanks.iter().map(|b| b.position).collect::<Vec<_>>(), vec![0, 1]);

        d.remove_blank(0).unwrap();
        assert!(matches!(d.remove_blank(0), Err(EditError::BelowMinimum { .. })));
    }

    #[test]
    fn alternatives_can_be_edited() {
        let (_, mut d, _) = draft(ExerciseType::FillInBlanks);
        let alt = d.add_alternative(0).unwrap();
        d.set_alternative(0, alt, "minou").unwrap();
        d.remove_alternative(0, 0).unwrap();
        let ExerciseBody::FillInBlanks { blanks } = &d.exercise().body else {
            panic!("expected blanks");
        };
        assert_eq!(blanks[0].acceptable_answers, vec!["matou", "minou"]);
        assert!(d.set_alternative(0, 7, "x").is_err());
    }

    #[test]
    fn removing_item_shifts_later_positions() {
        let (_, mut d, mut ids) = draft(ExerciseType::Ordering);
        d.add_item(&mut ids).unwrap();
        // positions 1,2,3,4; remove the item at position 2
        d.remove_item(1).unwrap();
        let ExerciseBody::Ordering { items } = &d.exercise().body else {
            panic!("expected items");
        };
        assert_eq!(items.iter().map(|i| i.position).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(items[2].text, "Étape 4");
    }

    #[test]
    fn ordering_keeps_two_items() {
        let (_, mut d, _) = draft(ExerciseType::Ordering);
        d.remove_item(2).unwrap();
        assert_eq!(
            d.remove_item(0),
            Err(EditError::BelowMinimum {
                what: "item",
                min: MIN_ITEMS
            })
        );
    }

    #[test]
    fn pairs_add_and_floor() {
        let (_, mut d, mut ids) = draft(ExerciseType::Matching);
        let idx = d.add_pair(&mut ids).unwrap();
        d.set_pair_text(idx, Side::Right, "Trois").unwrap();
        d.set_pair_image(idx, Side::Left, Some("  ".into())).unwrap();
        let ExerciseBody::Matching { pairs } = &d.exercise().body else {
            panic!("expected pairs");
        };
        assert_eq!(pairs[2].left, "Élément 3");
        assert_eq!(pairs[2].right, "Trois");
        assert_eq!(pairs[2].left_image, None);

        d.remove_pair(0).unwrap();
        assert!(d.remove_pair(0).is_err());
    }

    #[test]
    fn wrong_kind_is_reported() {
        let (_, mut d, mut ids) = draft(ExerciseType::Matching);
        assert_eq!(
            d.add_question(&mut ids),
            Err(EditError::WrongKind {
                operation: "add question",
                kind: ExerciseType::Matching
            })
        );
        assert!(d.add_option(ChoiceList::Legacy).is_err());
    }

    #[test]
    fn save_replaces_record_in_store() {
        let (mut store, mut d, mut ids) = draft(ExerciseType::Qcm);
        d.set_text("Géographie");
        d.set_exercise_number(0);
        d.add_question(&mut ids).unwrap();
        d.save(&mut store).unwrap();
        let stored = &store.exercises()[0];
        assert_eq!(stored.text, "Géographie");
        assert_eq!(stored.exercise_number, 1);
        assert_eq!(stored, d.exercise());
    }
}
