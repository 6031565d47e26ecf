use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `knowledge_stats` takes no arguments.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct KnowledgeStatsParams {}
