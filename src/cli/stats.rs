use anyhow::Result;

use crate::config::RecollectConfig;

/// Display record counts in the terminal.
pub async fn stats(config: &RecollectConfig) -> Result<()> {
    let knowledge = crate::server::build_knowledge_base(config)?;
    let response = knowledge.stats().await?;

    println!("Knowledge Statistics");
    println!("{}", "=".repeat(40));
    println!("  Backend:             {}", config.storage.backend);
    if config.storage.backend == "sqlite" {
        println!(
            "  Database:            {}",
            crate::config::expand_tilde(&config.storage.db_path).display()
        );
    }
    println!("  Total records:       {}", response.total_records);
    println!();

    println!("By Scope:");
    for (scope, count) in &response.by_scope {
        println!("  {:<12} {}", scope, count);
    }

    Ok(())
}
