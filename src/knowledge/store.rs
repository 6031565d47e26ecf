//! Write path: validate, embed, assign identity, stamp, write.
//!
//! [`KnowledgeBase::store`] is the single entry point. Records are never
//! updated afterwards; scope and project are fixed at write time.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{KnowledgeError, Result};
use crate::knowledge::fanout;
use crate::knowledge::scope::WILDCARD;
use crate::knowledge::types::{EntityType, KnowledgeRecord, Scope};
use crate::knowledge::KnowledgeBase;

/// Caller-supplied fields of a new record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub content: String,
    pub project_id: String,
    pub scope: Scope,
    pub entity_type: EntityType,
    pub source_session: Option<String>,
    pub manual_save: bool,
}

impl NewRecord {
    /// A non-priority record; `manual_save` defaults to false.
    pub fn new(
        content: impl Into<String>,
        project_id: impl Into<String>,
        scope: Scope,
        entity_type: EntityType,
    ) -> Self {
        Self {
            content: content.into(),
            project_id: project_id.into(),
            scope,
            entity_type,
            source_session: None,
            manual_save: false,
        }
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.source_session = Some(session.into());
        self
    }

    pub fn manual(mut self) -> Self {
        self.manual_save = true;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(KnowledgeError::invalid("content must not be empty"));
        }
        let project = self.project_id.trim();
        if project.is_empty() {
            return Err(KnowledgeError::invalid("project_id must not be empty"));
        }
        if project == WILDCARD {
            return Err(KnowledgeError::invalid(
                "project_id '*' is reserved for unrestricted search",
            ));
        }
        Ok(())
    }
}

/// Result returned from a store operation.
#[derive(Debug, Clone, Serialize)]
pub struct StoreResult {
    pub id: String,
    pub project_id: String,
    pub scope: Scope,
    pub entity_type: EntityType,
    pub manual_save: bool,
    pub timestamp: String,
}

/// Parse a scope name, reporting failures as `InvalidArgument`.
pub fn parse_scope(s: &str) -> Result<Scope> {
    s.parse().map_err(KnowledgeError::InvalidArgument)
}

/// Parse an entity type name, reporting failures as `InvalidArgument`.
pub fn parse_entity_type(s: &str) -> Result<EntityType> {
    s.parse().map_err(KnowledgeError::InvalidArgument)
}

/// Wall clock that never repeats or goes backwards: each reading is at least
/// one microsecond after the previous one, and after anything passed to
/// [`observe`](Self::observe).
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// Never hand out a reading at or before `t`.
    pub fn observe(&self, t: DateTime<Utc>) {
        self.last_micros.fetch_max(t.timestamp_micros(), Ordering::AcqRel);
    }

    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut prev = self.last_micros.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match self.last_micros.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now),
                Err(actual) => prev = actual,
            }
        }
    }
}

impl KnowledgeBase {
    /// Embed `new.content`, assign a fresh UUID v7 and creation time, and write
    /// one record. The write is visible to subsequent reads on the same store.
    pub async fn store(&self, new: NewRecord) -> Result<StoreResult> {
        new.validate()?;

        tracing::info!(
            content_len = new.content.len(),
            project = %new.project_id,
            scope = %new.scope,
            entity_type = %new.entity_type,
            manual_save = new.manual_save,
            "store called"
        );

        let embedding =
            fanout::embed_one(&self.embedder, &new.content, self.options.call_timeout).await?;

        let timestamp = self.next_timestamp().await?;
        let record = KnowledgeRecord {
            id: uuid::Uuid::now_v7().to_string(),
            content: new.content,
            embedding,
            project_id: new.project_id.trim().to_string(),
            scope: new.scope,
            entity_type: new.entity_type,
            source_session: new.source_session.filter(|s| !s.trim().is_empty()),
            timestamp,
            manual_save: new.manual_save,
        };

        let result = StoreResult {
            id: record.id.clone(),
            project_id: record.project_id.clone(),
            scope: record.scope,
            entity_type: record.entity_type,
            manual_save: record.manual_save,
            timestamp: record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        fanout::store_write(&self.store, move |store| store.add(&record)).await?;

        tracing::info!(id = %result.id, "knowledge stored");
        Ok(result)
    }

    /// Next creation time. The first write through this engine seeds the
    /// clock from the newest stored record, so timestamps keep increasing
    /// across restarts even if the wall clock stepped back.
    async fn next_timestamp(&self) -> Result<DateTime<Utc>> {
        self.clock_seed
            .get_or_try_init(|| async {
                let latest = fanout::store_call(&self.store, self.options.call_timeout, |store| {
                    store.latest_timestamp()
                })
                .await?;
                if let Some(t) = latest {
                    tracing::debug!(latest = %t, "clock seeded from store");
                    self.clock.observe(t);
                }
                Ok::<_, KnowledgeError>(())
            })
            .await?;
        Ok(self.clock.now())
    }
}
