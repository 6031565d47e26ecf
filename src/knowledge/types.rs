//! Core knowledge type definitions.
//!
//! Defines [`Scope`] (visibility tier), [`EntityType`] (classification),
//! [`KnowledgeRecord`] (a stored fact) and [`ScoredRecord`] (a search hit
//! carrying its raw distance).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visibility tier of a record. Closed set; never inferred from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Visible from every project.
    Global,
    /// Visible only when searching from the owning project.
    Local,
    /// Only reachable through the unrestricted `*` query.
    Private,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Global, Scope::Local, Scope::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
            Self::Private => "private",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            "private" => Ok(Self::Private),
            _ => Err(format!(
                "unknown scope: {s} (expected global, local or private)"
            )),
        }
    }
}

/// Classification of a record. Informational only; never used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Preference,
    Fact,
    Decision,
    CodeSnippet,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preference => "preference",
            Self::Fact => "fact",
            Self::Decision => "decision",
            Self::CodeSnippet => "code_snippet",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preference" => Ok(Self::Preference),
            "fact" => Ok(Self::Fact),
            "decision" => Ok(Self::Decision),
            "code_snippet" => Ok(Self::CodeSnippet),
            _ => Err(format!(
                "unknown entity type: {s} (expected preference, fact, decision or code_snippet)"
            )),
        }
    }
}

/// A stored knowledge record. Created once by the write path, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// UUID v7, unique across the whole store.
    pub id: String,
    /// Free-form text; the unit of semantic comparison.
    pub content: String,
    /// Embedding of `content`. Not part of tool output.
    #[serde(skip)]
    pub embedding: Vec<f32>,
    /// Owning project. A partition key, not a reference.
    pub project_id: String,
    pub scope: Scope,
    pub entity_type: EntityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_session: Option<String>,
    /// Creation time, stamped by the write path.
    pub timestamp: DateTime<Utc>,
    /// Caller-asserted priority. Reorders context output, never affects visibility.
    pub manual_save: bool,
}

/// A search hit: the record plus the similarity engine's raw distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: KnowledgeRecord,
    /// Lower is more similar.
    pub distance: f64,
}

impl ScoredRecord {
    /// Relevance percentage derived from distance: `(1 - d) * 100`, clamped
    /// to `[0, 100]`. Any distance at or above 1 is 0%.
    pub fn relevance(&self) -> f64 {
        relevance_percent(self.distance)
    }
}

pub fn relevance_percent(distance: f64) -> f64 {
    if distance.is_nan() || distance >= 1.0 {
        return 0.0;
    }
    ((1.0 - distance) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_closed_set() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), scope);
        }
        assert!("group".parse::<Scope>().is_err());
        assert!("Global".parse::<Scope>().is_err());
    }

    #[test]
    fn entity_type_round_trips_through_str() {
        let t: EntityType = "code_snippet".parse().unwrap();
        assert_eq!(t, EntityType::CodeSnippet);
        assert_eq!(t.to_string(), "code_snippet");
        assert!("snippet".parse::<EntityType>().is_err());
    }

    #[test]
    fn relevance_is_clamped() {
        assert_eq!(relevance_percent(0.0), 100.0);
        assert!((relevance_percent(0.25) - 75.0).abs() < 1e-9);
        assert_eq!(relevance_percent(1.0), 0.0);
        assert_eq!(relevance_percent(1.7), 0.0);
        assert_eq!(relevance_percent(-0.2), 100.0);
        assert_eq!(relevance_percent(f64::NAN), 0.0);
    }
}
