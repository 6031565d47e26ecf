//! SQLite-backed vector store.
//!
//! Filtered scans are plain `WHERE` clauses; nearest-neighbour queries rank the
//! filtered rows with sqlite-vec's `vec_distance_cosine`. The search is exact,
//! so a partition query never misses a closer record inside its own partition.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::VectorStore;
use crate::knowledge::scope::PartitionFilter;
use crate::knowledge::types::{KnowledgeRecord, ScoredRecord};

const RECORD_COLUMNS: &str = "id, content, embedding, project_id, scope, entity_type, \
                              source_session, timestamp, manual_save";

/// Cosine distance to `?3`. sqlite-vec yields NULL when either side has zero
/// norm; that case is distance 1, as in [`super::cosine_distance`].
const DISTANCE_SQL: &str = "COALESCE(vec_distance_cosine(embedding, ?3), 1.0)";

/// Optional-equality predicate: a NULL parameter leaves the column unconstrained.
const FILTER_SQL: &str = "(?1 IS NULL OR scope = ?1) AND (?2 IS NULL OR project_id = ?2)";

pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_connection(crate::db::open_database(path)?))
    }

    /// Wrap an already initialized connection (see [`crate::db::open_memory_database`]).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))
    }
}

impl VectorStore for SqliteVectorStore {
    fn add(&self, record: &KnowledgeRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO knowledge (id, content, embedding, project_id, scope, entity_type, \
             source_session, timestamp, manual_save) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.content,
                embedding_to_bytes(&record.embedding),
                record.project_id,
                record.scope.as_str(),
                record.entity_type.as_str(),
                record.source_session,
                record
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
                record.manual_save,
            ],
        )
        .with_context(|| format!("failed to insert record {}", record.id))?;
        Ok(())
    }

    fn get(&self, filter: &PartitionFilter) -> Result<Vec<KnowledgeRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {RECORD_COLUMNS} FROM knowledge WHERE {FILTER_SQL} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![filter.scope.map(|s| s.as_str()), filter.project_id],
                RawRecord::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawRecord::into_record).collect()
    }

    fn query(
        &self,
        embedding: &[f32],
        filter: &PartitionFilter,
        k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {RECORD_COLUMNS}, {DISTANCE_SQL} AS distance \
             FROM knowledge WHERE {FILTER_SQL} \
             ORDER BY distance, rowid LIMIT ?4"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    filter.scope.map(|s| s.as_str()),
                    filter.project_id,
                    embedding_to_bytes(embedding),
                    k as i64,
                ],
                |row| Ok((RawRecord::from_row(row)?, row.get::<_, f64>(9)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(raw, distance)| {
                Ok(ScoredRecord {
                    record: raw.into_record()?,
                    distance,
                })
            })
            .collect()
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM knowledge", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn count_matching(&self, filter: &PartitionFilter) -> Result<usize> {
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM knowledge WHERE {FILTER_SQL}");
        let n: i64 = conn.query_row(
            &sql,
            params![filter.scope.map(|s| s.as_str()), filter.project_id],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.lock()?;
        let latest: Option<String> =
            conn.query_row("SELECT MAX(timestamp) FROM knowledge", [], |row| row.get(0))?;
        latest
            .map(|ts| {
                DateTime::parse_from_rfc3339(&ts)
                    .map(|t| t.with_timezone(&Utc))
                    .with_context(|| format!("bad stored timestamp {ts}"))
            })
            .transpose()
    }
}

/// Row as stored; parsed into a [`KnowledgeRecord`] outside the rusqlite closure.
struct RawRecord {
    id: String,
    content: String,
    embedding: Vec<u8>,
    project_id: String,
    scope: String,
    entity_type: String,
    source_session: Option<String>,
    timestamp: String,
    manual_save: bool,
}

impl RawRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            embedding: row.get(2)?,
            project_id: row.get(3)?,
            scope: row.get(4)?,
            entity_type: row.get(5)?,
            source_session: row.get(6)?,
            timestamp: row.get(7)?,
            manual_save: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<KnowledgeRecord> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .with_context(|| format!("bad timestamp on record {}", self.id))?
            .with_timezone(&Utc);
        Ok(KnowledgeRecord {
            scope: self.scope.parse().map_err(anyhow::Error::msg)?,
            entity_type: self.entity_type.parse().map_err(anyhow::Error::msg)?,
            embedding: bytes_to_embedding(&self.embedding)?,
            id: self.id,
            content: self.content,
            project_id: self.project_id,
            source_session: self.source_session,
            timestamp,
            manual_save: self.manual_save,
        })
    }
}

/// Native-endian `f32` blob, the layout sqlite-vec expects.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|x| x.to_ne_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> Result<Vec<f32>> {
    anyhow::ensure!(
        bytes.len() % 4 == 0,
        "embedding blob length {} is not a multiple of 4",
        bytes.len()
    );
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
