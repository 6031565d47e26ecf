use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RecollectConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// `"stdio"` or `"http"`.
    pub transport: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// `"sqlite"` or `"memory"`.
    pub backend: String,
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_search_limit: usize,
    pub default_context_limit: usize,
    /// Deadline for each embedding call and each partition query.
    pub call_timeout_ms: u64,
    /// Per-partition fetch size multiplier for search. `1` fetches exactly `limit`.
    pub partition_overfetch: usize,
    /// Project used by `remember_now` when the caller names none.
    pub default_project: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            port: 8765,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_recollect_dir()
            .join("knowledge.db")
            .to_string_lossy()
            .into_owned();
        Self {
            backend: "sqlite".into(),
            db_path,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "http".into(),
            url: "http://localhost:8001/embed".into(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_search_limit: 5,
            default_context_limit: 10,
            call_timeout_ms: 30_000,
            partition_overfetch: 1,
            default_project: "default".into(),
        }
    }
}

/// Returns `~/.recollect/`, or `./.recollect/` when no home directory is known.
pub fn default_recollect_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".recollect")
}

/// Returns the default config file path: `~/.recollect/config.toml`
pub fn default_config_path() -> PathBuf {
    default_recollect_dir().join("config.toml")
}

impl RecollectConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            RecollectConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (RECOLLECT_DB, RECOLLECT_LOG_LEVEL, RECOLLECT_EMBED_URL, RECOLLECT_TRANSPORT).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RECOLLECT_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("RECOLLECT_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("RECOLLECT_EMBED_URL") {
            self.embedding.url = val;
        }
        if let Ok(val) = std::env::var("RECOLLECT_TRANSPORT") {
            self.server.transport = val;
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.retrieval.default_search_limit > 0 && self.retrieval.default_context_limit > 0,
            "retrieval limits must be positive"
        );
        anyhow::ensure!(
            self.retrieval.partition_overfetch > 0,
            "retrieval.partition_overfetch must be at least 1"
        );
        anyhow::ensure!(
            self.retrieval.call_timeout_ms > 0,
            "retrieval.call_timeout_ms must be positive"
        );
        Ok(())
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
