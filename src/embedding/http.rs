//! HTTP embedding client.
//!
//! Talks to an embedding service exposing `POST /embed` with body
//! `{"texts": [...]}` and answering `{"embeddings": [[...], ...]}`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use super::Embedder;
use crate::config::EmbeddingConfig;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    runtime: Handle,
}

impl HttpEmbedder {
    /// Build a client for `config.url`. Captures the current tokio runtime, which
    /// drives the requests issued from blocking threads.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let runtime = Handle::try_current().context("http embedder needs a tokio runtime")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("failed to build http client")?;
        tracing::info!(url = %config.url, "http embedder configured");
        Ok(Self {
            client,
            url: config.url.clone(),
            runtime,
        })
    }

    async fn post(&self, texts: &[&str]) -> Result<EmbedResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { texts })
            .send()
            .await
            .with_context(|| format!("embedding request to {} failed", self.url))?;

        anyhow::ensure!(
            response.status().is_success(),
            "embedding service answered HTTP {}",
            response.status()
        );

        response
            .json::<EmbedResponse>()
            .await
            .context("malformed embedding response")
    }
}

impl Embedder for HttpEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let response = self.runtime.block_on(self.post(texts))?;
        check_batch(texts.len(), response.embeddings)
    }
}

/// One non-empty vector per input, all of the same dimensionality.
fn check_batch(expected: usize, embeddings: Vec<Vec<f32>>) -> Result<Vec<Vec<f32>>> {
    anyhow::ensure!(
        embeddings.len() == expected,
        "embedding service returned {} vectors for {expected} texts",
        embeddings.len()
    );
    if let Some(first) = embeddings.first() {
        anyhow::ensure!(!first.is_empty(), "embedding service returned an empty vector");
        let dim = first.len();
        anyhow::ensure!(
            embeddings.iter().all(|e| e.len() == dim),
            "embedding service returned mixed dimensionalities"
        );
    }
    Ok(embeddings)
}
