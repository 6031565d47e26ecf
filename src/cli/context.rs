use anyhow::Result;

use crate::config::RecollectConfig;

/// Print the session-start context for a project.
pub async fn context(config: &RecollectConfig, project: &str, limit: Option<usize>) -> Result<()> {
    let knowledge = crate::server::build_knowledge_base(config)?;
    let limit = limit.unwrap_or(config.retrieval.default_context_limit);

    let records = knowledge.project_context(project, limit).await?;

    if records.is_empty() {
        println!("No stored context for project '{project}'.");
        return Ok(());
    }

    println!("Context for project '{project}':\n");
    for (i, record) in records.iter().enumerate() {
        let marker = if record.manual_save { "* " } else { "" };
        println!("  {marker}{}. {} ({})", i + 1, record.entity_type, record.scope);
        println!("     {}", super::truncate_preview(&record.content, 150));
        println!();
    }

    Ok(())
}
