//! Fan-out/merge similarity search.
//!
//! One embedding call, then one independent top-k query per resolved
//! partition, issued concurrently. The partition lists are merged by
//! [`merge_partitions`]: concatenate in partition order, drop repeated ids
//! (first occurrence wins), stable-sort by ascending distance, truncate.
//!
//! Recall caveat: each partition is asked for its own top `limit` (times
//! `partition_overfetch`) before the merged pool is cut back to `limit`.
//! Partitions are disjoint, so over an exact store the merge is the true
//! top-k of everything visible. Over an approximate index each partition's
//! list may already be missing candidates; raising `partition_overfetch`
//! narrows that gap.

use std::collections::HashSet;

use crate::error::{KnowledgeError, Result};
use crate::knowledge::fanout;
use crate::knowledge::scope::{resolve, ProjectSelector};
use crate::knowledge::types::ScoredRecord;
use crate::knowledge::KnowledgeBase;

impl KnowledgeBase {
    /// Semantic search over the partitions visible to `project`.
    ///
    /// Returns at most `limit` hits ordered by ascending distance. A failed or
    /// timed-out partition fails the whole call (see
    /// [`KnowledgeError::PartialPartitionFailure`]).
    pub async fn search(
        &self,
        query: &str,
        project: &ProjectSelector,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        if query.trim().is_empty() {
            return Err(KnowledgeError::invalid("query must not be empty"));
        }
        if limit == 0 {
            return Err(KnowledgeError::invalid("limit must be at least 1"));
        }

        let filters = resolve(project);
        tracing::info!(
            query_len = query.len(),
            project = ?project,
            partitions = filters.len(),
            limit,
            "search called"
        );

        let embedding =
            fanout::embed_one(&self.embedder, query, self.options.call_timeout).await?;

        let per_partition = limit.saturating_mul(self.options.partition_overfetch);
        let partitions = fanout::fan_out(
            &self.store,
            &filters,
            self.options.call_timeout,
            move |store, filter| store.query(&embedding, filter, per_partition),
        )
        .await?;

        let hits = merge_partitions(partitions, limit);
        tracing::debug!(hits = hits.len(), "search merged");
        Ok(hits)
    }
}

/// Merge per-partition hit lists into one list of at most `limit` entries.
///
/// Deterministic in its input: ties in distance keep partition order, then
/// rank within the partition.
pub fn merge_partitions(partitions: Vec<Vec<ScoredRecord>>, limit: usize) -> Vec<ScoredRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<ScoredRecord> = partitions
        .into_iter()
        .flatten()
        .filter(|hit| seen.insert(hit.record.id.clone()))
        .collect();

    merged.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::{EntityType, KnowledgeRecord, Scope};

    fn hit(id: &str, distance: f64) -> ScoredRecord {
        ScoredRecord {
            record: KnowledgeRecord {
                id: id.into(),
                content: id.into(),
                embedding: vec![],
                project_id: "p".into(),
                scope: Scope::Global,
                entity_type: EntityType::Fact,
                source_session: None,
                timestamp: chrono::Utc::now(),
                manual_save: false,
            },
            distance,
        }
    }

    fn ids(hits: &[ScoredRecord]) -> Vec<&str> {
        hits.iter().map(|h| h.record.id.as_str()).collect()
    }

    #[test]
    fn merge_sorts_across_partitions() {
        let local = vec![hit("l1", 0.2), hit("l2", 0.6)];
        let global = vec![hit("g1", 0.1), hit("g2", 0.4)];
        let merged = merge_partitions(vec![local, global], 10);
        assert_eq!(ids(&merged), vec!["g1", "l1", "g2", "l2"]);
    }

    #[test]
    fn merge_truncates_to_limit() {
        let merged = merge_partitions(
            vec![vec![hit("a", 0.3)], vec![hit("b", 0.1), hit("c", 0.2)]],
            2,
        );
        assert_eq!(ids(&merged), vec!["b", "c"]);
    }

    #[test]
    fn merge_dedups_first_occurrence_wins() {
        let merged = merge_partitions(
            vec![vec![hit("x", 0.5)], vec![hit("x", 0.1), hit("y", 0.3)]],
            10,
        );
        assert_eq!(ids(&merged), vec!["y", "x"]);
        assert_eq!(merged[1].distance, 0.5);
    }

    #[test]
    fn merge_ties_keep_partition_order() {
        let merged =
            merge_partitions(vec![vec![hit("first", 0.2)], vec![hit("second", 0.2)]], 10);
        assert_eq!(ids(&merged), vec!["first", "second"]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_partitions(vec![vec![], vec![]], 5).is_empty());
    }
}
