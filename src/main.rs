use anyhow::Result;
use clap::{Parser, Subcommand};
use recollect::{cli, config, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recollect", version, about = "Scoped knowledge memory MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (transport from config: stdio or http)
    Serve {
        /// Override the configured transport
        #[arg(long)]
        transport: Option<String>,
    },
    /// Search knowledge from the terminal
    Search {
        query: String,
        /// Project to search from; '*' searches everything
        #[arg(long, short)]
        project: Option<String>,
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Print a project's session-start context
    Context {
        project: String,
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Show record counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::RecollectConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { transport } => {
            if let Some(t) = transport {
                config.server.transport = t;
            }
            match config.server.transport.as_str() {
                "stdio" => server::serve_stdio(config).await?,
                "http" => server::serve_http(config).await?,
                other => anyhow::bail!("unknown transport: {other}. Supported: stdio, http"),
            }
        }
        Command::Search {
            query,
            project,
            limit,
        } => cli::search::search(&config, &query, project.as_deref(), limit).await?,
        Command::Context { project, limit } => {
            cli::context::context(&config, &project, limit).await?
        }
        Command::Stats => cli::stats::stats(&config).await?,
    }

    Ok(())
}
