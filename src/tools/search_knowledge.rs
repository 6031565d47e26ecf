//! MCP `search_knowledge` tool parameter and response definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::knowledge::types::ScoredRecord;

/// Parameters for the `search_knowledge` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchKnowledgeParams {
    #[schemars(description = "Natural language query")]
    pub query: String,

    /// Absent: global knowledge only. A project: its local plus global knowledge.
    /// `"*"`: everything, including every project's private records.
    #[schemars(
        description = "Project to search from. Omit for global knowledge only. '*' searches ALL records of ALL projects, including private ones."
    )]
    pub project_id: Option<String>,

    #[schemars(description = "Maximum number of results. Defaults to 5.")]
    pub limit: Option<usize>,
}

/// One search hit as returned to the client.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub hit: ScoredRecord,
    /// `(1 - distance)` as a percentage, clamped to `[0, 100]`.
    pub relevance: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
}

impl From<Vec<ScoredRecord>> for SearchResponse {
    fn from(hits: Vec<ScoredRecord>) -> Self {
        let results: Vec<SearchHit> = hits
            .into_iter()
            .map(|hit| SearchHit {
                relevance: (hit.relevance() * 10.0).round() / 10.0,
                hit,
            })
            .collect();
        Self {
            total: results.len(),
            results,
        }
    }
}
