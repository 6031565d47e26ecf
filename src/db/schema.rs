//! SQL DDL for the knowledge table.
//!
//! One row per record. Embeddings are raw native-endian `f32` blobs, compared
//! at query time with sqlite-vec's `vec_distance_cosine`. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS knowledge (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL,
    project_id TEXT NOT NULL,
    scope TEXT NOT NULL CHECK(scope IN ('global','local','private')),
    entity_type TEXT NOT NULL CHECK(entity_type IN ('preference','fact','decision','code_snippet')),
    source_session TEXT,
    timestamp TEXT NOT NULL,
    manual_save INTEGER NOT NULL DEFAULT 0 CHECK(manual_save IN (0, 1))
);

CREATE INDEX IF NOT EXISTS idx_knowledge_scope ON knowledge(scope);
CREATE INDEX IF NOT EXISTS idx_knowledge_scope_project ON knowledge(scope, project_id);
CREATE INDEX IF NOT EXISTS idx_knowledge_timestamp ON knowledge(timestamp);

CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Stored schema version, `0` if unreadable.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = 'schema_version'",
        [],
        |row| {
            let val: String = row.get(0)?;
            Ok(val.parse::<u32>().unwrap_or(0))
        },
    )
}
