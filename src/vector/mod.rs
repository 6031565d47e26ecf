//! Vector store collaborator.
//!
//! The knowledge engine never talks to storage directly; it holds an
//! `Arc<dyn VectorStore>` injected at construction. Two backends ship:
//! [`sqlite::SqliteVectorStore`] (persistent, sqlite-vec cosine distance) and
//! [`memory::InMemoryVectorStore`] (process-local, used by tests).
//!
//! All methods are synchronous. Async callers go through
//! `tokio::task::spawn_blocking`.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::StorageConfig;
use crate::knowledge::scope::PartitionFilter;
use crate::knowledge::types::{KnowledgeRecord, ScoredRecord};

pub trait VectorStore: Send + Sync {
    /// Persist one record. Fails if the id already exists.
    fn add(&self, record: &KnowledgeRecord) -> Result<()>;

    /// Exact filtered scan, in insertion order. No ranking, no limit.
    fn get(&self, filter: &PartitionFilter) -> Result<Vec<KnowledgeRecord>>;

    /// Up to `k` records matching `filter`, by ascending distance to `embedding`.
    fn query(
        &self,
        embedding: &[f32],
        filter: &PartitionFilter,
        k: usize,
    ) -> Result<Vec<ScoredRecord>>;

    /// Total number of stored records.
    fn count(&self) -> Result<usize>;

    /// Number of records matching `filter`. The default scans with [`get`](Self::get).
    fn count_matching(&self, filter: &PartitionFilter) -> Result<usize> {
        Ok(self.get(filter)?.len())
    }

    /// Creation time of the newest stored record, if any.
    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .get(&PartitionFilter::all())?
            .into_iter()
            .map(|r| r.timestamp)
            .max())
    }
}

/// Create the configured backend.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn VectorStore>> {
    match config.backend.as_str() {
        "sqlite" => {
            let path = crate::config::expand_tilde(&config.db_path);
            let store = sqlite::SqliteVectorStore::open(&path)?;
            tracing::info!(db = %path.display(), "sqlite vector store ready");
            Ok(Arc::new(store))
        }
        "memory" => {
            tracing::warn!("using in-memory vector store; knowledge is lost on exit");
            Ok(Arc::new(memory::InMemoryVectorStore::new()))
        }
        other => anyhow::bail!("unknown storage backend: {other}. Supported: sqlite, memory"),
    }
}

/// Cosine distance (`1 - cosine similarity`), in `[0, 2]`.
///
/// Zero-norm vectors are at distance 1 from everything, including each other.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    anyhow::ensure!(
        a.len() == b.len(),
        "embedding dimension mismatch: {} vs {}",
        a.len(),
        b.len()
    );
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(1.0);
    }
    Ok(1.0 - dot / (norm_a.sqrt() * norm_b.sqrt()))
}
