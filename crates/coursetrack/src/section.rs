//! Per-section view model.
//!
//! A [`Section`] is what the page shows for one content block: whether it
//! is done, and the note the user is typing. It is the in-memory side of
//! the state; the store holds the persistent side.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Visual completion state of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// Marked complete.
    Completed,
    /// Not yet complete.
    Ready,
}

impl SectionStatus {
    /// Build a status from a completion flag.
    #[must_use]
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Completed
        } else {
            Self::Ready
        }
    }

    /// Text shown next to the status indicator.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Ready => "Ready to watch",
        }
    }

    /// Background of the status indicator dot.
    #[must_use]
    pub fn indicator_color(self) -> &'static str {
        match self {
            Self::Completed => "var(--success-color)",
            Self::Ready => "var(--accent-color)",
        }
    }

    /// Whether the container carries the `completed` style class.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// The note input of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteField {
    /// Current text of the input.
    pub text: String,
    /// Current selection, in chars.
    pub selection: Range<usize>,
}

impl NoteField {
    /// A note input holding `text` with the cursor at the end.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Value shown by the character counter.
    ///
    /// Counts Unicode scalar values, so an emoji with a skin-tone modifier
    /// counts 2 where a UTF-16 length would give 4.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One content block on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Identifier, unique within the page.
    pub id: String,
    /// Completion as currently shown.
    pub completed: bool,
    /// Non-persistent marker set when the store refused a completion write.
    pub fallback_completed: bool,
    /// The note input, if the section has one.
    pub note: Option<NoteField>,
}

impl Section {
    /// A section with a note input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            completed: false,
            fallback_completed: false,
            note: Some(NoteField::default()),
        }
    }

    /// A section without a note input.
    #[must_use]
    pub fn without_notes(id: impl Into<String>) -> Self {
        Self {
            note: None,
            ..Self::new(id)
        }
    }

    /// Current visual status.
    #[must_use]
    pub fn status(&self) -> SectionStatus {
        SectionStatus::from_completed(self.completed)
    }

    /// Character count of the note, 0 without a note input.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.note.as_ref().map_or(0, NoteField::char_count)
    }

    /// Note text, empty without a note input.
    #[must_use]
    pub fn note_text(&self) -> &str {
        self.note.as_ref().map_or("", |note| note.text.as_str())
    }
}
