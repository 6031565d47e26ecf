//! Scoped knowledge retrieval engine.
//!
//! [`KnowledgeBase`] bundles the two external collaborators (a
//! [`VectorStore`] and an [`Embedder`]) with the call limits, and exposes the
//! four operations:
//!
//! - [`KnowledgeBase::store`]: validate, embed, stamp and write one record
//! - [`KnowledgeBase::search`]: resolve scope, fan out one similarity query per
//!   partition, merge, dedup, sort by distance, truncate
//! - [`KnowledgeBase::project_context`]: scan a project's local and global
//!   partitions and order by manual-save priority
//! - [`KnowledgeBase::stats`]: record counts
//!
//! The engine keeps no cache and takes no locks of its own. Consistency is
//! whatever the injected store provides.

pub mod context;
mod fanout;
pub mod scope;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::config::RetrievalConfig;
use crate::embedding::Embedder;
use crate::vector::VectorStore;

use store::MonotonicClock;

/// Per-call limits applied by the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Deadline for each embedding call and each store read. Writes run to
    /// completion.
    pub call_timeout: Duration,
    /// Each search partition fetches `limit * partition_overfetch` candidates.
    pub partition_overfetch: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

impl From<&RetrievalConfig> for EngineOptions {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            call_timeout: Duration::from_millis(config.call_timeout_ms),
            partition_overfetch: config.partition_overfetch.max(1),
        }
    }
}

/// Shared handle to the knowledge engine. Cheap to clone.
#[derive(Clone)]
pub struct KnowledgeBase {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    options: EngineOptions,
    clock: Arc<MonotonicClock>,
    clock_seed: Arc<OnceCell<()>>,
}

impl KnowledgeBase {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        options: EngineOptions,
    ) -> Self {
        Self {
            store,
            embedder,
            options,
            clock: Arc::new(MonotonicClock::default()),
            clock_seed: Arc::new(OnceCell::new()),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}
