//! Session-start context aggregation.
//!
//! No query text and no similarity ranking: fetch every record in the
//! project's local partition and in the global partition, then let manual
//! saves jump the queue. Within each priority class, fetch order is kept.

use std::collections::HashSet;

use crate::error::{KnowledgeError, Result};
use crate::knowledge::fanout;
use crate::knowledge::scope::{resolve, ProjectSelector, WILDCARD};
use crate::knowledge::types::KnowledgeRecord;
use crate::knowledge::KnowledgeBase;

impl KnowledgeBase {
    /// Up to `limit` records for `project_id`: every `manual_save` record ahead
    /// of every other, local records ahead of global ones within a class.
    pub async fn project_context(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<KnowledgeRecord>> {
        let project = project_id.trim();
        if project.is_empty() {
            return Err(KnowledgeError::invalid("project_id must not be empty"));
        }
        if project == WILDCARD {
            return Err(KnowledgeError::invalid(
                "project context needs a concrete project_id, not '*'",
            ));
        }
        if limit == 0 {
            return Err(KnowledgeError::invalid("limit must be at least 1"));
        }

        let filters = resolve(&ProjectSelector::Project(project.to_string()));
        tracing::info!(project = %project, limit, "project_context called");

        let partitions = fanout::fan_out(
            &self.store,
            &filters,
            self.options.call_timeout,
            |store, filter| store.get(filter),
        )
        .await?;

        let records = prioritize(partitions, limit);
        tracing::debug!(records = records.len(), "project context assembled");
        Ok(records)
    }
}

/// Concatenate partitions, drop repeated ids (earlier partition wins), put
/// manual saves first with a stable sort, truncate.
pub fn prioritize(partitions: Vec<Vec<KnowledgeRecord>>, limit: usize) -> Vec<KnowledgeRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<KnowledgeRecord> = partitions
        .into_iter()
        .flatten()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();

    merged.sort_by_key(|r| !r.manual_save);
    merged.truncate(limit);
    merged
}
