#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use recollect::embedding::Embedder;
use recollect::knowledge::scope::PartitionFilter;
use recollect::knowledge::types::{KnowledgeRecord, Scope, ScoredRecord};
use recollect::knowledge::{EngineOptions, KnowledgeBase};
use recollect::vector::memory::InMemoryVectorStore;
use recollect::vector::sqlite::SqliteVectorStore;
use recollect::vector::VectorStore;

/// Deterministic embedder: scripted vectors for known texts, a 26-dim
/// letter-frequency vector for everything else.
#[derive(Default)]
pub struct ScriptedEmbedder {
    scripted: HashMap<String, Vec<f32>>,
}

impl ScriptedEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.scripted.insert(text.to_string(), vector);
        self
    }
}

impl Embedder for ScriptedEmbedder {
    fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                self.scripted
                    .get(*t)
                    .cloned()
                    .unwrap_or_else(|| letter_vector(t))
            })
            .collect())
    }
}

pub fn letter_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    for c in text.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
        v[(c - b'a') as usize] += 1.0;
    }
    v
}

/// 26-dim unit vector pointing mostly along `axis`, tilted towards `axis + 1`
/// by `tilt` (0.0 = exactly on axis). Cosine distance to the bare axis grows with tilt.
pub fn axis_vector(axis: usize, tilt: f32) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    v[axis % 26] = 1.0;
    v[(axis + 1) % 26] = tilt;
    v
}

/// Embedder that always fails, as if the service were down.
pub struct DownEmbedder;

impl Embedder for DownEmbedder {
    fn embed(&self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        anyhow::bail!("connection refused")
    }
}

/// Embedder that answers only after `delay`.
pub struct SlowEmbedder(pub Duration);

impl Embedder for SlowEmbedder {
    fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        std::thread::sleep(self.0);
        Ok(texts.iter().map(|t| letter_vector(t)).collect())
    }
}

/// What a [`FaultyStore`] does to reads of one scope.
#[derive(Clone, Copy)]
pub enum Fault {
    Fail,
    Delay(Duration),
}

/// Wraps a store and injects faults into reads whose filter targets `scope`
/// (or every read when `scope` is `None`), and optionally into writes.
pub struct FaultyStore {
    pub inner: Arc<dyn VectorStore>,
    pub scope: Option<Scope>,
    pub fault: Fault,
    pub fail_writes: bool,
}

impl FaultyStore {
    fn inject(&self, filter: &PartitionFilter) -> anyhow::Result<()> {
        if self.scope.is_some() && filter.scope != self.scope {
            return Ok(());
        }
        match self.fault {
            Fault::Fail => anyhow::bail!("partition offline"),
            Fault::Delay(d) => {
                std::thread::sleep(d);
                Ok(())
            }
        }
    }
}

impl VectorStore for FaultyStore {
    fn add(&self, record: &KnowledgeRecord) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.inner.add(record)
    }

    fn get(&self, filter: &PartitionFilter) -> anyhow::Result<Vec<KnowledgeRecord>> {
        self.inject(filter)?;
        self.inner.get(filter)
    }

    fn query(
        &self,
        embedding: &[f32],
        filter: &PartitionFilter,
        k: usize,
    ) -> anyhow::Result<Vec<ScoredRecord>> {
        self.inject(filter)?;
        self.inner.query(embedding, filter, k)
    }

    fn count(&self) -> anyhow::Result<usize> {
        self.inner.count()
    }

    fn count_matching(&self, filter: &PartitionFilter) -> anyhow::Result<usize> {
        self.inject(filter)?;
        self.inner.count_matching(filter)
    }

    fn latest_timestamp(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        self.inner.latest_timestamp()
    }
}

/// Wraps a store so every `add` takes `delay` before it lands.
pub struct SlowWrites {
    pub inner: Arc<dyn VectorStore>,
    pub delay: Duration,
}

impl VectorStore for SlowWrites {
    fn add(&self, record: &KnowledgeRecord) -> anyhow::Result<()> {
        std::thread::sleep(self.delay);
        self.inner.add(record)
    }

    fn get(&self, filter: &PartitionFilter) -> anyhow::Result<Vec<KnowledgeRecord>> {
        self.inner.get(filter)
    }

    fn query(
        &self,
        embedding: &[f32],
        filter: &PartitionFilter,
        k: usize,
    ) -> anyhow::Result<Vec<ScoredRecord>> {
        self.inner.query(embedding, filter, k)
    }

    fn count(&self) -> anyhow::Result<usize> {
        self.inner.count()
    }
}

pub fn memory_store() -> Arc<dyn VectorStore> {
    Arc::new(InMemoryVectorStore::new())
}

pub fn sqlite_store() -> Arc<dyn VectorStore> {
    let conn = recollect::db::open_memory_database().unwrap();
    Arc::new(SqliteVectorStore::from_connection(conn))
}

/// Both shipped backends, for tests that must hold on either.
pub fn backends() -> Vec<(&'static str, Arc<dyn VectorStore>)> {
    vec![("memory", memory_store()), ("sqlite", sqlite_store())]
}

pub fn knowledge_base(store: Arc<dyn VectorStore>, embedder: impl Embedder + 'static) -> KnowledgeBase {
    KnowledgeBase::new(store, Arc::new(embedder), EngineOptions::default())
}

pub fn knowledge_base_with_timeout(
    store: Arc<dyn VectorStore>,
    embedder: impl Embedder + 'static,
    timeout: Duration,
) -> KnowledgeBase {
    let options = EngineOptions {
        call_timeout: timeout,
        ..EngineOptions::default()
    };
    KnowledgeBase::new(store, Arc::new(embedder), options)
}

pub fn ids(hits: &[ScoredRecord]) -> Vec<&str> {
    hits.iter().map(|h| h.record.id.as_str()).collect()
}

pub fn contents(hits: &[ScoredRecord]) -> Vec<&str> {
    hits.iter().map(|h| h.record.content.as_str()).collect()
}
