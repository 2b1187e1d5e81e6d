//! Lightweight inline formatting for note text.
//!
//! Wraps the selected part of a note in Markdown-style delimiters. Offsets
//! are char offsets into the note text, the same unit the selection uses.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Inline emphasis style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// `**bold**`
    Bold,
    /// `*italic*`
    Italic,
}

impl Emphasis {
    /// Delimiter placed on both sides of the selection.
    #[must_use]
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
        }
    }
}

impl std::fmt::Display for Emphasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bold => write!(f, "bold"),
            Self::Italic => write!(f, "italic"),
        }
    }
}

/// Note text after formatting, with the selection moved to the same words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// The full note text.
    pub text: String,
    /// Selection covering the originally selected text, inside the delimiters.
    pub selection: Range<usize>,
}

/// Wrap `selection` of `text` with the delimiter of `emphasis`.
///
/// Bounds past the end are clamped and reversed bounds are swapped.
/// Returns `None` when nothing is selected.
#[must_use]
pub fn apply_emphasis(text: &str, selection: Range<usize>, emphasis: Emphasis) -> Option<Formatted> {
    let selection = normalize_selection(text, selection);
    if selection.is_empty() {
        return None;
    }

    let delimiter = emphasis.delimiter();
    let start = byte_offset(text, selection.start);
    let end = byte_offset(text, selection.end);

    let mut out = String::with_capacity(text.len() + 2 * delimiter.len());
    out.push_str(&text[..start]);
    out.push_str(delimiter);
    out.push_str(&text[start..end]);
    out.push_str(delimiter);
    out.push_str(&text[end..]);

    let shift = delimiter.chars().count();
    Some(Formatted {
        text: out,
        selection: selection.start + shift..selection.end + shift,
    })
}

/// Clamp a char range to `text` and order its bounds.
#[must_use]
pub fn normalize_selection(text: &str, selection: Range<usize>) -> Range<usize> {
    let len = text.chars().count();
    let (a, b) = (selection.start.min(len), selection.end.min(len));
    a.min(b)..a.max(b)
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}
