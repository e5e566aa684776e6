//! Database schema and migrations for Depot.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - uploads table
    r#"
-- One row per completed upload. Rows are immutable once written and
-- are never removed when the underlying file is deleted; the table is
-- an upload history, not a live inventory.
CREATE TABLE uploads (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    original_name TEXT NOT NULL,
    stored_name   TEXT NOT NULL UNIQUE,
    upload_time   TEXT NOT NULL
);

CREATE INDEX idx_uploads_upload_time ON uploads(upload_time);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_creates_uploads() {
        assert!(MIGRATIONS[0].contains("CREATE TABLE uploads"));
        assert!(MIGRATIONS[0].contains("stored_name"));
    }
}
