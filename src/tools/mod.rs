pub mod get_project_context;
pub mod knowledge_stats;
pub mod remember_now;
pub mod search_knowledge;
pub mod store_knowledge;

use get_project_context::{ContextResponse, GetProjectContextParams};
use knowledge_stats::KnowledgeStatsParams;
use remember_now::RememberNowParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_knowledge::{SearchKnowledgeParams, SearchResponse};
use std::sync::Arc;
use store_knowledge::StoreKnowledgeParams;

use crate::config::RecollectConfig;
use crate::knowledge::scope::ProjectSelector;
use crate::knowledge::store::{parse_entity_type, parse_scope, NewRecord};
use crate::knowledge::types::{EntityType, Scope};
use crate::knowledge::KnowledgeBase;

/// The MCP tool handler. Holds the shared knowledge engine and config and
/// exposes the tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct RecollectTools {
    tool_router: ToolRouter<Self>,
    knowledge: KnowledgeBase,
    config: Arc<RecollectConfig>,
}

#[tool_router]
impl RecollectTools {
    pub fn new(knowledge: KnowledgeBase, config: Arc<RecollectConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            knowledge,
            config,
        }
    }

    /// Store a piece of knowledge.
    #[tool(description = "Store knowledge in the shared memory. Scope: global (every project), local (this project only), private (only reachable through an unrestricted '*' search).")]
    async fn store_knowledge(
        &self,
        Parameters(params): Parameters<StoreKnowledgeParams>,
    ) -> Result<String, String> {
        let scope = match params.scope.as_deref() {
            Some(s) => parse_scope(s).map_err(|e| e.to_string())?,
            None => Scope::Local,
        };
        let entity_type = match params.entity_type.as_deref() {
            Some(t) => parse_entity_type(t).map_err(|e| e.to_string())?,
            None => EntityType::Fact,
        };

        let mut new = NewRecord::new(params.content, params.project_id, scope, entity_type);
        if let Some(session) = params.source_session {
            new = new.with_session(session);
        }

        let result = self.knowledge.store(new).await.map_err(|e| e.to_string())?;
        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Priority save: always `manual_save = true`.
    #[tool(description = "Remember an important fact right now. Saved with priority, so it is listed first in every project context load.")]
    async fn remember_now(
        &self,
        Parameters(params): Parameters<RememberNowParams>,
    ) -> Result<String, String> {
        let scope = match params.scope.as_deref() {
            Some(s) => parse_scope(s).map_err(|e| e.to_string())?,
            None => Scope::Global,
        };
        let project = params
            .project_id
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.config.retrieval.default_project.clone());

        let new = NewRecord::new(params.content, project, scope, EntityType::Preference).manual();
        let result = self.knowledge.store(new).await.map_err(|e| e.to_string())?;
        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Semantic search scoped to a project context.
    #[tool(description = "Search knowledge by meaning. Without project_id only global knowledge is searched; with a project_id, that project's local knowledge plus global knowledge; project_id '*' searches everything, including every project's private records.")]
    async fn search_knowledge(
        &self,
        Parameters(params): Parameters<SearchKnowledgeParams>,
    ) -> Result<String, String> {
        let selector = ProjectSelector::from_request(params.project_id.as_deref());
        let limit = params
            .limit
            .unwrap_or(self.config.retrieval.default_search_limit);

        let hits = self
            .knowledge
            .search(&params.query, &selector, limit)
            .await
            .map_err(|e| e.to_string())?;

        serde_json::to_string(&SearchResponse::from(hits))
            .map_err(|e| format!("serialization failed: {e}"))
    }

    /// Session-start context for a project.
    #[tool(description = "Load a project's context at session start: its local knowledge plus global knowledge, priority saves first.")]
    async fn get_project_context(
        &self,
        Parameters(params): Parameters<GetProjectContextParams>,
    ) -> Result<String, String> {
        let limit = params
            .limit
            .unwrap_or(self.config.retrieval.default_context_limit);

        let records = self
            .knowledge
            .project_context(&params.project_id, limit)
            .await
            .map_err(|e| e.to_string())?;

        let response = ContextResponse {
            project_id: params.project_id,
            total: records.len(),
            records,
        };
        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    #[tool(description = "Count stored knowledge records, overall and per scope.")]
    async fn knowledge_stats(
        &self,
        Parameters(_params): Parameters<KnowledgeStatsParams>,
    ) -> Result<String, String> {
        let stats = self.knowledge.stats().await.map_err(|e| e.to_string())?;
        serde_json::to_string(&stats).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for RecollectTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Recollect is a scoped knowledge memory. Call get_project_context at session \
                 start, store_knowledge or remember_now to save, search_knowledge to recall."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
