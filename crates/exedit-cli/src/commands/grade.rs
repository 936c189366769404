//! The `exedit grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use exedit_core::grader::{grade, AnswerSheet};

use super::{GlobalOpts, Library};

pub fn execute(opts: &GlobalOpts, id: String, answers: PathBuf, json: bool) -> Result<()> {
    let store = Library::resolve(opts)?.load()?;
    let exercise = store
        .get(&id)
        .with_context(|| format!("exercise not found: {id}"))?;

    let content = std::fs::read_to_string(&answers)
        .with_context(|| format!("failed to read answers from {}", answers.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("failed to parse answers JSON")?;
    let sheet = AnswerSheet::from_json(exercise, &value)?;
    let verdict = grade(exercise, &sheet)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    println!("{} ({})", exercise.id, exercise.kind().label());
    for (i, ok) in verdict.elements.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, if *ok { "correct" } else { "incorrect" });
    }
    println!(
        "{} {}/{}: {}",
        if verdict.passed { "PASSED" } else { "FAILED" },
        verdict.correct,
        verdict.total,
        verdict.message
    );
    if !exercise.explanation.is_empty() {
        println!("Explanation: {}", exercise.explanation);
    }
    Ok(())
}
