//! Collection statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Exercise, ExerciseType};

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub validated: usize,
    pub pending: usize,
    /// Every type, legacy ones included, with zero counts kept.
    pub by_type: BTreeMap<ExerciseType, usize>,
}

impl CollectionStats {
    pub fn compute(exercises: &[Exercise]) -> Self {
        let mut by_type: BTreeMap<ExerciseType, usize> =
            ExerciseType::ALL.into_iter().map(|t| (t, 0)).collect();
        let mut validated = 0;
        for exercise in exercises {
            *by_type.entry(exercise.kind()).or_default() += 1;
            if exercise.is_validated() {
                validated += 1;
            }
        }
        Self {
            total: exercises.len(),
            validated,
            pending: exercises.len() - validated,
            by_type,
        }
    }

    pub fn count(&self, kind: ExerciseType) -> usize {
        self.by_type.get(&kind).copied().unwrap_or(0)
    }

    /// Share of validated exercises, from 0.0 to 1.0.
    pub fn validated_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.validated as f64 / self.total as f64
    }
}
