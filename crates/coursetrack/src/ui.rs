//! Instructions for the host page.
//!
//! Nothing in this crate touches a rendered page. Operations return
//! [`UiUpdate`] values and the host applies them; the `ctrack` binary does
//! so on a terminal.

use std::ops::Range;
use std::time::Duration;

use serde::Serialize;

use crate::section::SectionStatus;

/// Text of the confirmation asked before clearing a note.
pub const CLEAR_NOTE_PROMPT: &str = "Are you sure you want to clear all notes for this video?";

/// Role an element plays on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Per-section "mark complete" button.
    CompleteButton,
    /// Per-section "unmark" button.
    UnmarkButton,
    /// Per-section note input.
    NotesInput,
    /// Bold button of a notes container.
    BoldButton,
    /// Italic button of a notes container.
    ItalicButton,
    /// Clear button of a notes container.
    ClearButton,
    /// Export button.
    ExportButton,
    /// Button opening the file picker.
    ImportDataButton,
    /// Hidden file input receiving the backup.
    ImportInput,
    /// Carousel scroll-left button.
    LeftScroll,
    /// Carousel scroll-right button.
    RightScroll,
    /// The navigation carousel itself.
    NavCarousel,
    /// A link inside the carousel.
    NavLink,
    /// Floating action button.
    MainFab,
    /// Previous-page trigger.
    LeftNav,
    /// Next-page trigger.
    RightNav,
    /// The document as a whole.
    Document,
    /// The browser window.
    Window,
}

/// One change the host page should make.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiUpdate {
    /// Restyle a section container and its status indicator.
    SectionStyle {
        /// Section id.
        section: String,
        /// New status.
        status: SectionStatus,
    },
    /// Replace the text of a note input.
    NoteText {
        /// Section id.
        section: String,
        /// New text.
        text: String,
    },
    /// Set a section's character counter.
    CharCount {
        /// Section id.
        section: String,
        /// Counter value.
        count: usize,
    },
    /// Set the selection of a note input.
    Selection {
        /// Section id.
        section: String,
        /// Selected char range.
        selection: Range<usize>,
    },
    /// Focus a note input.
    Focus {
        /// Section id.
        section: String,
    },
    /// Show a message to the user.
    Alert {
        /// Message text.
        message: String,
    },
    /// Offer a file for download.
    Download {
        /// Suggested file name.
        file_name: String,
        /// File contents.
        contents: String,
    },
    /// Reload the page.
    Reload,
    /// Scroll the carousel horizontally by a pixel delta.
    ScrollCarousel {
        /// Pixels, negative to the left.
        delta: i32,
    },
    /// Enable or disable the carousel scroll buttons.
    ScrollButtons {
        /// Left button disabled.
        left_disabled: bool,
        /// Right button disabled.
        right_disabled: bool,
    },
    /// Bring a carousel item into view, centered.
    RevealNavItem {
        /// Item index.
        index: usize,
    },
    /// Mark a carousel item active, clearing the others.
    ActivateNavItem {
        /// Item index.
        index: usize,
    },
    /// Smoothly scroll the window to a vertical offset.
    ScrollWindow {
        /// Target offset in pixels.
        top: f64,
    },
    /// Open or close the floating action menu.
    FabMenu {
        /// Whether the menu is shown.
        open: bool,
    },
    /// Show the loading overlay.
    ShowLoading,
    /// Go to another page after a delay.
    Navigate {
        /// Target URL.
        target: String,
        /// Delay before leaving.
        #[serde(with = "duration_ms")]
        delay: Duration,
    },
    /// Click another element.
    Click {
        /// Element to click.
        role: Role,
    },
}

impl UiUpdate {
    /// Build an alert.
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::Alert {
            message: message.into(),
        }
    }
}

/// Synchronous yes/no question to the user.
pub trait Prompt {
    /// Ask `message`; `true` means the user agreed.
    fn confirm(&mut self, message: &str) -> bool;
}

/// A [`Prompt`] that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }
}
