//! SQLite schema definition.

/// Complete database schema for nutricare.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value slots
-- ============================================================================

-- One row per named slot; the patient collection lives in a single row as a
-- JSON array.
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
