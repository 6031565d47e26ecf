use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::knowledge::types::KnowledgeRecord;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetProjectContextParams {
    #[schemars(description = "Project id to load context for")]
    pub project_id: String,

    #[schemars(description = "Maximum number of records. Defaults to 10.")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub project_id: String,
    pub records: Vec<KnowledgeRecord>,
    pub total: usize,
}
