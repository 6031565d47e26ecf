use anyhow::Result;

use crate::config::RecollectConfig;
use crate::knowledge::scope::ProjectSelector;

/// Run a search from the terminal.
pub async fn search(
    config: &RecollectConfig,
    query: &str,
    project: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let knowledge = crate::server::build_knowledge_base(config)?;
    let selector = ProjectSelector::from_request(project);
    let limit = limit.unwrap_or(config.retrieval.default_search_limit);

    let hits = knowledge.search(query, &selector, limit).await?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        let record = &hit.record;
        println!(
            "  {}. [{}] (scope: {}, relevance: {:.1}%)",
            i + 1,
            record.entity_type,
            record.scope,
            hit.relevance(),
        );
        println!("     {}", super::truncate_preview(&record.content, 200));
        println!(
            "     project: {} | {}",
            record.project_id,
            record.timestamp.to_rfc3339()
        );
        println!();
    }

    Ok(())
}
