//! MCP `remember_now` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for `remember_now`. Always stored as a priority (manual) save.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RememberNowParams {
    #[schemars(description = "What to remember")]
    pub content: String,

    #[schemars(description = "Owning project id. Defaults to the configured default project.")]
    pub project_id: Option<String>,

    #[schemars(
        description = "Visibility: 'global' (all projects), 'local' or 'private'. Defaults to 'global'."
    )]
    pub scope: Option<String>,
}
