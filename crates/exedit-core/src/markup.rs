//! Prompt markup: blank markers and `$…$` math spans.
//!
//! Rendering math is left to the front end; this module only finds where
//! the spans are.

use crate::model::BLANK_MARKER;

/// A piece of a fill-in-the-blanks prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// The blank with this zero-based index.
    Blank(usize),
}

/// A piece of prose that may contain math.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    Plain(&'a str),
    /// Math source without the surrounding `$`.
    Math(&'a str),
}

/// Split a prompt into text and blank segments. Empty text is skipped.
pub fn segments(prompt: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    for (i, part) in prompt.split(BLANK_MARKER).enumerate() {
        if i > 0 {
            out.push(Segment::Blank(i - 1));
        }
        if !part.is_empty() {
            out.push(Segment::Text(part));
        }
    }
    out
}

/// Number of blank markers in a prompt.
pub fn blank_count(prompt: &str) -> usize {
    prompt.matches(BLANK_MARKER).count()
}

/// Split text on non-empty `$…$` pairs. An unpaired `$` stays plain.
pub fn spans(text: &str) -> Vec<Span<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;
    while let Some(rel) = text[cursor..].find('$') {
        let body_start = cursor + rel + 1;
        match text[body_start..].find('$') {
            None => break,
            // `$$` opens nothing; retry from the second `$`
            Some(0) => cursor = body_start,
            Some(len) => {
                let open = body_start - 1;
                if open > plain_start {
                    out.push(Span::Plain(&text[plain_start..open]));
                }
                out.push(Span::Math(&text[body_start..body_start + len]));
                cursor = body_start + len + 1;
                plain_start = cursor;
            }
        }
    }
    if plain_start < text.len() {
        out.push(Span::Plain(&text[plain_start..]));
    }
    out
}

/// Whether `$` delimiters pair up.
pub fn math_balanced(text: &str) -> bool {
    text.matches('$').count() % 2 == 0
}
