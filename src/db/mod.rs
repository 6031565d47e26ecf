//! SQLite plumbing for the on-disk vector store backend.
//!
//! Registers `sqlite-vec` (which provides `vec_distance_cosine`), opens the
//! database file and applies the schema from [`schema`].

pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sqlite_vec::sqlite3_vec_init;
use std::path::Path;
use std::sync::Once;

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open (or create) the knowledge database at `path`, creating parent
/// directories as needed.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    load_sqlite_vec();
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;
    prepare(&conn)?;

    tracing::info!(path = %path.display(), "knowledge database ready");
    Ok(conn)
}

/// Open an in-memory database. Used by tests and throwaway stores.
pub fn open_memory_database() -> Result<Connection> {
    load_sqlite_vec();
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare(&conn)?;
    Ok(conn)
}

/// Version string reported by the loaded sqlite-vec extension.
pub fn sqlite_vec_version(conn: &Connection) -> Result<String> {
    conn.query_row("SELECT vec_version()", [], |r| r.get(0))
        .context("sqlite-vec is not loaded")
}

fn prepare(conn: &Connection) -> Result<()> {
    let vec_version = sqlite_vec_version(conn)?;
    schema::init_schema(conn).context("failed to initialize schema")?;
    tracing::debug!(
        sqlite_vec = %vec_version,
        schema = schema::SCHEMA_VERSION,
        "knowledge schema applied"
    );
    Ok(())
}
