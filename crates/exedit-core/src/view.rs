//! Filtering and sorting of the exercise list.
//!
//! [`visible`] is a pure function of the collection and a [`ViewQuery`].
//! There is no pagination; the whole filtered list is returned.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Exercise, ExerciseType, ValidationStatus};

/// School levels in pedagogical order.
pub const LEVEL_ORDER: [&str; 12] = [
    "CP", "CE1", "CE2", "CM1", "CM2", "6ème", "5ème", "4ème", "3ème", "2nde", "1ère", "Terminale",
];

/// Rank of a level in [`LEVEL_ORDER`]; unknown levels rank after all of them.
pub fn level_rank(level: &str) -> usize {
    LEVEL_ORDER
        .iter()
        .position(|l| *l == level)
        .unwrap_or(LEVEL_ORDER.len())
}

/// Either everything or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

/// The four list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub kind: Selector<ExerciseType>,
    #[serde(default)]
    pub status: Selector<ValidationStatus>,
    #[serde(default)]
    pub subject: Selector<String>,
    #[serde(default)]
    pub level: Selector<String>,
}

impl Filters {
    pub fn accepts(&self, exercise: &Exercise) -> bool {
        self.kind.accepts(&exercise.kind())
            && self.status.accepts(&exercise.validation_status)
            && self.subject.accepts(&exercise.subject)
            && self.level.accepts(&exercise.level)
    }
}

/// Field the list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    ConceptName,
    Subject,
    Level,
    ExerciseNumber,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::ConceptName => write!(f, "concept_name"),
            SortKey::Subject => write!(f, "subject"),
            SortKey::Level => write!(f, "level"),
            SortKey::ExerciseNumber => write!(f, "exercise_number"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "concept_name" | "conceptname" | "concept" => Ok(SortKey::ConceptName),
            "subject" => Ok(SortKey::Subject),
            "level" => Ok(SortKey::Level),
            "exercise_number" | "exercisenumber" | "number" => Ok(SortKey::ExerciseNumber),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Everything that determines the visible list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ViewQuery {
    /// Reset filters and search, keeping the sort order.
    pub fn reset_filters(&mut self) {
        self.filters = Filters::default();
        self.search.clear();
    }
}

/// Case-insensitive search over prompt, id, concept name, subject and level.
///
/// Blank search text matches everything.
pub fn matches_search(exercise: &Exercise, search: &str) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        &exercise.text,
        &exercise.id,
        &exercise.concept_name,
        &exercise.subject,
        &exercise.level,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

fn compare(a: &Exercise, b: &Exercise, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match key {
        SortKey::ConceptName => a.concept_name.cmp(&b.concept_name),
        SortKey::Subject => a.subject.cmp(&b.subject),
        SortKey::ExerciseNumber => a.exercise_number.cmp(&b.exercise_number),
        SortKey::Level => {
            let (ra, rb) = (level_rank(&a.level), level_rank(&b.level));
            let unknown = LEVEL_ORDER.len();
            // Unknown levels stay last in either direction.
            match (ra == unknown, rb == unknown) {
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                _ => ra.cmp(&rb),
            }
        }
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Filter and sort `exercises` according to `query`.
pub fn visible<'a>(exercises: &'a [Exercise], query: &ViewQuery) -> Vec<&'a Exercise> {
    let mut list: Vec<&Exercise> = exercises
        .iter()
        .filter(|e| query.filters.accepts(e) && matches_search(e, &query.search))
        .collect();
    list.sort_by(|a, b| compare(a, b, query.sort_by, query.direction));
    list
}

/// Distinct non-empty values of a field, sorted, for filter menus.
pub fn distinct_values<'a>(
    exercises: &'a [Exercise],
    field: impl Fn(&'a Exercise) -> &'a str,
) -> Vec<&'a str> {
    let mut values: Vec<&str> = exercises
        .iter()
        .map(field)
        .filter(|v| !v.is_empty())
        .collect();
    values.sort_unstable();
    values.dedup();
    values
}
