//! Text-to-vector embedding collaborator.
//!
//! The knowledge engine holds an `Arc<dyn Embedder>` injected at construction.
//! The shipped implementation is [`http::HttpEmbedder`], a client for a
//! sentence-embedding service that keeps its model warm in a separate process.

pub mod http;

use std::sync::Arc;

use anyhow::Result;

/// Trait for embedding text into vectors.
///
/// Implementations must be deterministic for identical input and return the
/// same dimensionality for every call within a process lifetime. All methods
/// are synchronous; callers in async contexts use `tokio::task::spawn_blocking`.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text])?;
        anyhow::ensure!(
            vectors.len() == 1,
            "embedder returned {} vectors for 1 input",
            vectors.len()
        );
        Ok(vectors.remove(0))
    }
}

/// Create an embedder from config.
///
/// Currently only `"http"` is supported. Must be called from within a tokio runtime.
pub fn create_provider(config: &crate::config::EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "http" => {
            let provider = http::HttpEmbedder::new(config)?;
            Ok(Arc::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: http"),
    }
}
