//! Backup documents.
//!
//! A backup is a flat JSON object mapping storage keys to stored values,
//! written with two-space indentation. Parsing is strict: anything that is
//! not a JSON object fails as a whole.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// An ordered snapshot of storage entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backup {
    entries: Vec<(String, String)>,
}

impl Backup {
    /// An empty backup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the backup holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a backup document.
    ///
    /// String values have literal `\n` sequences turned into newlines.
    /// Other JSON values are kept as their compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBackup`] if the text is not valid JSON or
    /// its top level is not an object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::malformed_backup(e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(Error::malformed_backup(format!(
                "top level must be an object, found {}",
                json_kind(&value)
            )));
        };

        // Object keys are already unique.
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(text) => unescape_newlines(&text),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Ok(Self { entries })
    }
}

impl Serialize for Backup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Backup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut backup = Self::new();
        for (key, value) in iter {
            backup.insert(key, value);
        }
        backup
    }
}

/// Outcome of importing a backup into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportReport {
    /// Entries written to the store.
    pub written: usize,
    /// Entries belonging to other pages, left out.
    pub skipped: usize,
    /// Entries the store refused.
    pub failed: usize,
}

/// Replace each literal two-char `\n` sequence with a newline.
#[must_use]
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_backup_serializes_to_empty_object() {
        assert_eq!(Backup::new().to_pretty_json().unwrap(), "{}");
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let backup: Backup = [("/p-a", "completed")].into_iter().collect();
        assert_eq!(
            backup.to_pretty_json().unwrap(),
            "{\n  \"/p-a\": \"completed\"\n}"
        );
    }

    #[test]
    fn test_serialization_keeps_insertion_order() {
        let backup: Backup = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = backup.to_pretty_json().unwrap();
        assert!(json.find("\"z\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn test_parse_string_values() {
        let backup = Backup::parse(r#"{"/p-a": "completed", "/p-notes-a": "hi"}"#).unwrap();
        assert_eq!(backup.len(), 2);
        assert_eq!(backup.get("/p-a"), Some("completed"));
        assert_eq!(backup.get("/p-notes-a"), Some("hi"));
    }

    #[test]
    fn test_parse_unescapes_literal_newlines() {
        // The JSON text holds a backslash followed by `n`, not a newline escape.
        let backup = Backup::parse(r#"{"/p-notes-a": "one\\ntwo"}"#).unwrap();
        assert_eq!(backup.get("/p-notes-a"), Some("one\ntwo"));
    }

    #[test]
    fn test_parse_keeps_real_newlines() {
        let backup = Backup::parse(r#"{"/p-notes-a": "one\ntwo"}"#).unwrap();
        assert_eq!(backup.get("/p-notes-a"), Some("one\ntwo"));
    }

    #[test]
    fn test_parse_non_string_values_as_json_text() {
        let backup = Backup::parse(r#"{"a": 1, "b": true, "c": null, "d": [1,2]}"#).unwrap();
        assert_eq!(backup.get("a"), Some("1"));
        assert_eq!(backup.get("b"), Some("true"));
        assert_eq!(backup.get("c"), Some("null"));
        assert_eq!(backup.get("d"), Some("[1,2]"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = Backup::parse("{\"a\": ").unwrap_err();
        assert!(err.is_malformed_backup());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = Backup::parse("[1, 2]").unwrap_err();
        assert!(err.is_malformed_backup());
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_export_text_parses_back() {
        let backup: Backup = [("/p-a", "completed"), ("/p-notes-a", "line\nnext")]
            .into_iter()
            .collect();
        let parsed = Backup::parse(&backup.to_pretty_json().unwrap()).unwrap();
        assert_eq!(parsed.get("/p-a"), Some("completed"));
        assert_eq!(parsed.get("/p-notes-a"), Some("line\nnext"));
    }

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines("a\\nb\\n"), "a\nb\n");
        assert_eq!(unescape_newlines("plain"), "plain");
    }

    #[test]
    fn test_parse_large_document() {
        let text = format!(
            "{{{}}}",
            (0..5000)
                .map(|i| format!("\"/p-s{i}\": \"completed\""))
                .collect::<Vec<_>>()
                .join(",")
        );
        let backup = Backup::parse(&text).unwrap();
        assert_eq!(backup.len(), 5000);
        assert_eq!(backup.get("/p-s4999"), Some("completed"));
    }

    #[test]
    fn test_parse_duplicate_key_keeps_last() {
        let backup = Backup::parse(r#"{"/p-a": "one", "/p-a": "two"}"#).unwrap();
        assert_eq!(backup.len(), 1);
        assert_eq!(backup.get("/p-a"), Some("two"));
    }
}
