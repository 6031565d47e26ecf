use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::knowledge::fanout;
use crate::knowledge::scope::PartitionFilter;
use crate::knowledge::types::Scope;
use crate::knowledge::KnowledgeBase;

/// Response from `knowledge_stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_records: usize,
    pub by_scope: BTreeMap<String, usize>,
}

impl KnowledgeBase {
    /// Record counts, overall and per scope.
    pub async fn stats(&self) -> Result<StatsResponse> {
        let timeout = self.options.call_timeout;
        let total_records = fanout::store_call(&self.store, timeout, |store| store.count()).await?;

        let filters: Vec<PartitionFilter> = Scope::ALL
            .iter()
            .map(|scope| PartitionFilter {
                scope: Some(*scope),
                project_id: None,
            })
            .collect();
        let counts = fanout::fan_out(&self.store, &filters, timeout, |store, filter| {
            store.count_matching(filter)
        })
        .await?;

        let by_scope = Scope::ALL
            .iter()
            .map(|s| s.to_string())
            .zip(counts)
            .collect();

        Ok(StatsResponse {
            total_records,
            by_scope,
        })
    }
}
