//! Collaborator traits.
//!
//! The store asks an [`IdSource`] for fresh identifiers and a [`Confirm`]
//! implementation before destructive actions, so front ends and tests can
//! plug in their own behavior.

use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifier generation
// ---------------------------------------------------------------------------

/// Source of fresh identifiers for exercises and their parts.
pub trait IdSource {
    /// Return a new identifier starting with `prefix` (e.g. `ex`, `q`, `item`).
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random identifiers, e.g. `ex-3f2a…`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

/// Deterministic identifiers, e.g. `ex-1`, `q-2`.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}", self.counter)
    }
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Return `true` to proceed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> bool {
        tracing::debug!("auto-confirming: {prompt}");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("ex"), "ex-1");
        assert_eq!(ids.next_id("q"), "q-2");
    }

    #[test]
    fn uuid_ids_are_prefixed_and_unique() {
        let mut ids = UuidIds;
        let a = ids.next_id("item");
        let b = ids.next_id("item");
        assert!(a.starts_with("item-"));
        assert_ne!(a, b);
    }

    #[test]
    fn closures_confirm() {
        let mut seen = Vec::new();
        let mut decline = |prompt: &str| {
            seen.push(prompt.to_string());
            false
        };
        assert!(!decline.confirm("delete?"));
        assert!(AssumeYes.confirm("delete?"));
        assert_eq!(seen, vec!["delete?"]);
    }
}
