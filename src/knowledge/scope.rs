//! Scope resolution: which partitions of the knowledge base a caller may see.
//!
//! [`resolve`] is the entire visibility policy. Search and context aggregation
//! both go through it (or through [`PartitionFilter`] built the same way) and
//! never re-derive scope rules on their own.
//!
//! | Request            | Partitions                                   |
//! |--------------------|----------------------------------------------|
//! | `"*"`              | everything, including every project's private records |
//! | concrete project P | `scope = local AND project_id = P`, `scope = global` |
//! | absent             | `scope = global`                             |
//!
//! The wildcard is an explicit escape hatch, not a "my private notes" view:
//! it bypasses all scope filtering.

use serde::Serialize;

use crate::knowledge::types::{KnowledgeRecord, Scope};

/// The literal project id that requests unrestricted reads.
pub const WILDCARD: &str = "*";

/// A caller's requested project context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSelector {
    /// `"*"`: every record in the store.
    Unrestricted,
    /// A concrete project: its local records plus all global ones.
    Project(String),
    /// No project supplied: global records only.
    Unspecified,
}

impl ProjectSelector {
    /// Interpret an optional project id from a request. Blank strings count as absent.
    pub fn from_request(project_id: Option<&str>) -> Self {
        match project_id.map(str::trim) {
            Some(WILDCARD) => Self::Unrestricted,
            Some(p) if !p.is_empty() => Self::Project(p.to_string()),
            _ => Self::Unspecified,
        }
    }
}

/// Conjunction of equality constraints over `scope` and `project_id`.
/// `None` leaves the field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PartitionFilter {
    pub scope: Option<Scope>,
    pub project_id: Option<String>,
}

impl PartitionFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// `scope = global`, any project.
    pub fn global() -> Self {
        Self {
            scope: Some(Scope::Global),
            project_id: None,
        }
    }

    /// `scope = local AND project_id = project`.
    pub fn local_to(project: impl Into<String>) -> Self {
        Self {
            scope: Some(Scope::Local),
            project_id: Some(project.into()),
        }
    }

    pub fn matches(&self, record: &KnowledgeRecord) -> bool {
        self.scope.map_or(true, |s| s == record.scope)
            && self
                .project_id
                .as_deref()
                .map_or(true, |p| p == record.project_id)
    }
}

impl std::fmt::Display for PartitionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.scope, &self.project_id) {
            (None, None) => f.write_str("all records"),
            (Some(s), None) => write!(f, "scope={s}"),
            (None, Some(p)) => write!(f, "project_id={p}"),
            (Some(s), Some(p)) => write!(f, "scope={s} AND project_id={p}"),
        }
    }
}

/// Resolve a request into the ordered partition filters to query.
pub fn resolve(selector: &ProjectSelector) -> Vec<PartitionFilter> {
    match selector {
        ProjectSelector::Unrestricted => vec![PartitionFilter::all()],
        ProjectSelector::Project(p) => {
            vec![PartitionFilter::local_to(p.as_str()), PartitionFilter::global()]
        }
        ProjectSelector::Unspecified => vec![PartitionFilter::global()],
    }
}
