//! Process-local vector store. Exact cosine search over a `Vec`.

use std::sync::RwLock;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use super::{cosine_distance, VectorStore};
use crate::knowledge::scope::PartitionFilter;
use crate::knowledge::types::{KnowledgeRecord, ScoredRecord};

#[derive(Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<KnowledgeRecord>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<KnowledgeRecord>>> {
        self.records
            .read()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {e}"))
    }
}

impl VectorStore for InMemoryVectorStore {
    fn add(&self, record: &KnowledgeRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {e}"))?;
        if records.iter().any(|r| r.id == record.id) {
            bail!("duplicate record id: {}", record.id);
        }
        records.push(record.clone());
        Ok(())
    }

    fn get(&self, filter: &PartitionFilter) -> Result<Vec<KnowledgeRecord>> {
        let records = self.read()?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    fn query(
        &self,
        embedding: &[f32],
        filter: &PartitionFilter,
        k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let records = self.read()?;

        let mut scored = Vec::new();
        for record in records.iter().filter(|r| filter.matches(r)) {
            let distance = cosine_distance(embedding, &record.embedding)?;
            scored.push(ScoredRecord {
                record: record.clone(),
                distance,
            });
        }
        // Stable: equal distances keep insertion order.
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn count_matching(&self, filter: &PartitionFilter) -> Result<usize> {
        Ok(self.read()?.iter().filter(|r| filter.matches(r)).count())
    }

    fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.iter().map(|r| r.timestamp).max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::{EntityType, Scope};

    fn record(id: &str, scope: Scope, project: &str, embedding: Vec<f32>) -> KnowledgeRecord {
        KnowledgeRecord {
            id: id.into(),
            content: format!("content of {id}"),
            embedding,
            project_id: project.into(),
            scope,
            entity_type: EntityType::Fact,
            source_session: None,
            timestamp: chrono::Utc::now(),
            manual_save: false,
        }
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let store = InMemoryVectorStore::new();
        store.add(&record("a", Scope::Global, "p", vec![1.0, 0.0])).unwrap();
        assert!(store.add(&record("a", Scope::Local, "p", vec![0.0, 1.0])).is_err());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn query_ranks_within_filter() {
        let store = InMemoryVectorStore::new();
        store.add(&record("near", Scope::Global, "p", vec![1.0, 0.1])).unwrap();
        store.add(&record("far", Scope::Global, "p", vec![0.0, 1.0])).unwrap();
        store.add(&record("hidden", Scope::Local, "p", vec![1.0, 0.0])).unwrap();

        let hits = store.query(&[1.0, 0.0], &PartitionFilter::global(), 10).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.record.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!(hits[0].distance < hits[1].distance);

        let top1 = store.query(&[1.0, 0.0], &PartitionFilter::global(), 1).unwrap();
        assert_eq!(top1.len(), 1);
    }

    #[test]
    fn get_preserves_insertion_order() {
        let store = InMemoryVectorStore::new();
        for id in ["c", "a", "b"] {
            store.add(&record(id, Scope::Local, "p", vec![1.0])).unwrap();
        }
        store.add(&record("other", Scope::Local, "q", vec![1.0])).unwrap();
        let ids: Vec<String> = store
            .get(&PartitionFilter::local_to("p"))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
