//! Storage key layout and page context.
//!
//! Every key this crate touches for a page starts with that page's path.
//! Isolation between pages is nothing more than that prefix:
//!
//! - completion flag: `<path>-<section>`
//! - note text: `<path>-notes-<section>`

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Value stored under a completion key.
pub const COMPLETED_SENTINEL: &str = "completed";

/// Discriminator placed between the page path and the section id for notes.
const NOTES_DISCRIMINATOR: &str = "notes-";

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]").expect("static regex is valid")
});

/// Which piece of section state a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The completion flag.
    Completion,
    /// The free-text note.
    Notes,
}

impl Field {
    /// Text inserted between the page path separator and the section id.
    #[must_use]
    pub fn discriminator(self) -> &'static str {
        match self {
            Self::Completion => "",
            Self::Notes => NOTES_DISCRIMINATOR,
        }
    }
}

/// The page a state manager works on.
///
/// Passed in at construction instead of being read from ambient globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    /// Path of the current page, e.g. `/courses/rust/week-1.html`.
    pub page_path: String,
    /// Title of the current document, used to name backups.
    pub document_title: String,
}

impl PageContext {
    /// Create a new page context.
    #[must_use]
    pub fn new(page_path: impl Into<String>, document_title: impl Into<String>) -> Self {
        Self {
            page_path: page_path.into(),
            document_title: document_title.into(),
        }
    }

    /// Build the storage key for one field of a section on this page.
    #[must_use]
    pub fn key(&self, section_id: &str, field: Field) -> String {
        format!("{}-{}{}", self.page_path, field.discriminator(), section_id)
    }

    /// Storage key of a section's completion flag.
    #[must_use]
    pub fn completion_key(&self, section_id: &str) -> String {
        self.key(section_id, Field::Completion)
    }

    /// Storage key of a section's note text.
    #[must_use]
    pub fn notes_key(&self, section_id: &str) -> String {
        self.key(section_id, Field::Notes)
    }

    /// Whether `key` lives under this page's namespace.
    #[must_use]
    pub fn owns(&self, key: &str) -> bool {
        key.starts_with(&self.page_path)
    }

    /// Split a key of this page back into its field and section id.
    ///
    /// Returns `None` for keys outside the namespace or without the `-`
    /// separator. A section id that itself starts with `notes-` cannot be
    /// told apart from a note key and parses as one.
    #[must_use]
    pub fn parse_key<'a>(&self, key: &'a str) -> Option<(Field, &'a str)> {
        let rest = key.strip_prefix(self.page_path.as_str())?.strip_prefix('-')?;
        match rest.strip_prefix(NOTES_DISCRIMINATOR) {
            Some(id) if !id.is_empty() => Some((Field::Notes, id)),
            _ if rest.is_empty() => None,
            _ => Some((Field::Completion, rest)),
        }
    }

    /// Recover the section ids that have any state stored under this page.
    ///
    /// Ids come back sorted and de-duplicated.
    pub fn section_ids_from_keys<I, K>(&self, keys: I) -> Vec<String>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .filter_map(|key| {
                self.parse_key(key.as_ref())
                    .map(|(_, id)| id.to_string())
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Name of the file a backup of this page is downloaded as.
    ///
    /// Falls back to the page path when the document has no title.
    #[must_use]
    pub fn backup_file_name(&self, suffix: &str) -> String {
        let title = if self.document_title.is_empty() {
            &self.page_path
        } else {
            &self.document_title
        };
        backup_file_name(title, suffix)
    }
}

/// Replace every char outside `[A-Za-z0-9]` with `_`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    NON_ALPHANUMERIC.replace_all(title, "_").into_owned()
}

/// Build a backup file name from a document title and a suffix.
#[must_use]
pub fn backup_file_name(title: &str, suffix: &str) -> String {
    format!("{}{suffix}", sanitize_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PageContext {
        PageContext::new("/course/week-1", "Week 1: Ownership")
    }

    #[test]
    fn test_completion_key_layout() {
        assert_eq!(context().completion_key("video-3"), "/course/week-1-video-3");
    }

    #[test]
    fn test_notes_key_layout() {
        assert_eq!(
            context().notes_key("video-3"),
            "/course/week-1-notes-video-3"
        );
    }

    #[test]
    fn test_keys_are_prefixed_by_page_path() {
        let ctx = context();
        assert!(ctx.owns(&ctx.completion_key("a")));
        assert!(ctx.owns(&ctx.notes_key("a")));
        assert!(!ctx.owns("/course/week-2-a"));
    }

    #[test]
    fn test_parse_key_round_trip() {
        let ctx = context();
        assert_eq!(
            ctx.parse_key(&ctx.completion_key("intro")),
            Some((Field::Completion, "intro"))
        );
        assert_eq!(
            ctx.parse_key(&ctx.notes_key("intro")),
            Some((Field::Notes, "intro"))
        );
    }

    #[test]
    fn test_parse_key_rejects_foreign_and_bare_keys() {
        let ctx = context();
        assert_eq!(ctx.parse_key("/other-intro"), None);
        assert_eq!(ctx.parse_key("/course/week-1"), None);
        assert_eq!(ctx.parse_key("/course/week-1-"), None);
    }

    #[test]
    fn test_section_ids_from_keys() {
        let ctx = context();
        let keys = vec![
            ctx.completion_key("b"),
            ctx.notes_key("a"),
            ctx.notes_key("b"),
            "/elsewhere-c".to_string(),
        ];
        assert_eq!(ctx.section_ids_from_keys(&keys), vec!["a", "b"]);
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Week 1: Ownership"), "Week_1__Ownership");
        assert_eq!(sanitize_title("abcXYZ019"), "abcXYZ019");
        assert_eq!(sanitize_title("Café"), "Caf_");
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(
            context().backup_file_name("_backup.json"),
            "Week_1__Ownership_backup.json"
        );
    }

    #[test]
    fn test_backup_file_name_without_title() {
        let ctx = PageContext::new("/intro.html", "");
        assert_eq!(ctx.backup_file_name("_backup.json"), "_intro_html_backup.json");
    }

    #[test]
    fn test_field_discriminator() {
        assert_eq!(Field::Completion.discriminator(), "");
        assert_eq!(Field::Notes.discriminator(), "notes-");
    }
}
