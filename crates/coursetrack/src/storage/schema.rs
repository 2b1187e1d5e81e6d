//! `SQLite` schema definitions for coursetrack.

/// SQL statement to create the entries table.
///
/// `id` fixes each key's enumeration index at first insertion.
pub const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key TEXT NOT NULL UNIQUE,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ENTRIES_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_entries_table_contains_required_columns() {
        assert!(CREATE_ENTRIES_TABLE.contains("key TEXT NOT NULL UNIQUE"));
        assert!(CREATE_ENTRIES_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_ENTRIES_TABLE.contains("updated_at TEXT NOT NULL"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
