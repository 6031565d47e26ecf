//! Concurrent dispatch of collaborator calls.
//!
//! Each call runs on the blocking pool under its own deadline. Partition
//! results are joined in partition order, never completion order, and failed
//! partitions are reported rather than treated as empty.

use std::sync::Arc;
use std::time::Duration;

use crate::embedding::Embedder;
use crate::error::{KnowledgeError, Result};
use crate::knowledge::scope::PartitionFilter;
use crate::vector::VectorStore;

/// Embed one text on the blocking pool, bounded by `timeout`.
pub(crate) async fn embed_one(
    embedder: &Arc<dyn Embedder>,
    text: &str,
    timeout: Duration,
) -> Result<Vec<f32>> {
    let embedder = Arc::clone(embedder);
    let text = text.to_string();
    let task = tokio::task::spawn_blocking(move || embedder.embed_one(&text));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(vector))) => Ok(vector),
        Ok(Ok(Err(e))) => Err(KnowledgeError::EmbeddingUnavailable(format!("{e:#}"))),
        Ok(Err(e)) => Err(KnowledgeError::EmbeddingUnavailable(format!(
            "embedding task failed: {e}"
        ))),
        Err(_) => Err(KnowledgeError::EmbeddingUnavailable(format!(
            "timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

/// Run one store call on the blocking pool, bounded by `timeout`.
pub(crate) async fn store_call<T, F>(
    store: &Arc<dyn VectorStore>,
    timeout: Duration,
    op: F,
) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn VectorStore) -> anyhow::Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    let task = tokio::task::spawn_blocking(move || op(store.as_ref()));
    settle(tokio::time::timeout(timeout, task).await, timeout)
        .map_err(KnowledgeError::StoreUnavailable)
}

/// Run one store write on the blocking pool and wait for it to finish.
///
/// No deadline: a dropped blocking task keeps running, so timing out here
/// would report a failure for a write that still lands.
pub(crate) async fn store_write<F>(store: &Arc<dyn VectorStore>, op: F) -> Result<()>
where
    F: FnOnce(&dyn VectorStore) -> anyhow::Result<()> + Send + 'static,
{
    let store = Arc::clone(store);
    match tokio::task::spawn_blocking(move || op(store.as_ref())).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(KnowledgeError::StoreUnavailable(format!("{e:#}"))),
        Err(e) => Err(KnowledgeError::StoreUnavailable(format!(
            "store task failed: {e}"
        ))),
    }
}

/// Run `op` once per partition, all concurrently, and join in partition order.
///
/// Every partition's deadline starts when it is spawned, so awaiting the
/// handles one after another still bounds the whole fan-out by `timeout`.
pub(crate) async fn fan_out<T, F>(
    store: &Arc<dyn VectorStore>,
    filters: &[PartitionFilter],
    timeout: Duration,
    op: F,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(&dyn VectorStore, &PartitionFilter) -> anyhow::Result<T> + Send + Sync + 'static,
{
    let op = Arc::new(op);
    let pending: Vec<_> = filters
        .iter()
        .map(|filter| {
            let store = Arc::clone(store);
            let op = Arc::clone(&op);
            let owned = filter.clone();
            let task = tokio::task::spawn_blocking(move || (*op)(store.as_ref(), &owned));
            (filter.to_string(), tokio::time::timeout(timeout, task))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(pending.len());
    for (label, deadline) in pending {
        outcomes.push((label, settle(deadline.await, timeout)));
    }
    collect_partitions(outcomes)
}

type Deadlined<T> = std::result::Result<
    std::result::Result<anyhow::Result<T>, tokio::task::JoinError>,
    tokio::time::error::Elapsed,
>;

fn settle<T>(outcome: Deadlined<T>, timeout: Duration) -> std::result::Result<T, String> {
    match outcome {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(e))) => Err(format!("{e:#}")),
        Ok(Err(e)) => Err(format!("store task failed: {e}")),
        Err(_) => Err(format!("timed out after {}ms", timeout.as_millis())),
    }
}

/// Classify labelled partition outcomes, kept in partition order.
///
/// All succeeded: the values. None succeeded: `StoreUnavailable`. Some of each:
/// `PartialPartitionFailure`, since dropping a failed partition would silently
/// shrink recall.
pub(crate) fn collect_partitions<T>(
    outcomes: Vec<(String, std::result::Result<T, String>)>,
) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(outcomes.len());
    let mut failed = Vec::new();

    for (label, outcome) in outcomes {
        match outcome {
            Ok(value) => values.push(value),
            Err(reason) => {
                tracing::warn!(partition = %label, %reason, "partition query failed");
                failed.push(format!("{label}: {reason}"));
            }
        }
    }

    if failed.is_empty() {
        Ok(values)
    } else if values.is_empty() {
        Err(KnowledgeError::StoreUnavailable(failed.join("; ")))
    } else {
        Err(KnowledgeError::PartialPartitionFailure {
            failed,
            succeeded: values.len(),
        })
    }
}
