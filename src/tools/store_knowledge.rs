use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreKnowledgeParams {
    #[schemars(description = "Text to store")]
    pub content: String,

    #[schemars(description = "Owning project id, e.g. 'orchestrator_agent'")]
    pub project_id: String,

    #[schemars(
        description = "Visibility: 'global' (all projects), 'local' (this project only), 'private' (only via '*' search). Defaults to 'local'."
    )]
    pub scope: Option<String>,

    #[schemars(
        description = "Kind of knowledge: 'preference', 'fact', 'decision', 'code_snippet'. Defaults to 'fact'."
    )]
    pub entity_type: Option<String>,

    #[schemars(description = "Optional session id for correlation")]
    pub source_session: Option<String>,
}
