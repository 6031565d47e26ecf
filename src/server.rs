//! MCP server initialization for stdio and streamable HTTP transports.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! vector store, embedder, and MCP tool handler into a running server.

use crate::config::RecollectConfig;
use crate::knowledge::{EngineOptions, KnowledgeBase};
use crate::tools::RecollectTools;
use crate::{embedding, vector};
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;

/// Shared setup: open the store, create the embedder, build the engine.
/// Both handles are created once and reused for the process lifetime.
pub fn build_knowledge_base(config: &RecollectConfig) -> Result<KnowledgeBase> {
    let store = vector::create_store(&config.storage)?;
    let embedder = embedding::create_provider(&config.embedding)?;
    tracing::info!("embedding provider ready");

    Ok(KnowledgeBase::new(
        store,
        embedder,
        EngineOptions::from(&config.retrieval),
    ))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: RecollectConfig) -> Result<()> {
    tracing::info!("starting Recollect MCP server on stdio");

    let knowledge = build_knowledge_base(&config)?;
    let tools = RecollectTools::new(knowledge, Arc::new(config));
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Start the MCP server over streamable HTTP transport, mounted at `/mcp`.
pub async fn serve_http(config: RecollectConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(addr = %bind_addr, "starting Recollect MCP server on HTTP");

    let knowledge = build_knowledge_base(&config)?;
    let config = Arc::new(config);

    let service = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(RecollectTools::new(knowledge.clone(), config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "MCP server listening at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
