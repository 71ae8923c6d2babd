//! Informational lint over loaded trails.
//!
//! Flags geometries that tend to produce surprising classifications. Nothing
//! here filters or alters trails; classification runs on the input as given.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::{ProximityConfig, Trail};

/// A potential problem with an input trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TrailIssue {
    /// Only one vertex; start and end coincide
    SinglePoint { name: String },
    /// Two or more vertices but the endpoints are closer than the tolerance
    VeryShort { name: String, endpoint_gap: f64 },
    /// Several trails share a name
    DuplicateName { name: String, count: usize },
}

impl fmt::Display for TrailIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailIssue::SinglePoint { name } => {
                write!(f, "Trail '{}' has a single point", name)
            }
            TrailIssue::VeryShort { name, endpoint_gap } => write!(
                f,
                "Trail '{}' is very short (endpoints {:.6} apart)",
                name, endpoint_gap
            ),
            TrailIssue::DuplicateName { name, count } => {
                write!(f, "Trail name '{}' is used {} times", name, count)
            }
        }
    }
}

/// Collect issues: per-trail issues in input order, then duplicate names in
/// order of first appearance.
pub fn lint_trails(trails: &[Trail], config: &ProximityConfig) -> Vec<TrailIssue> {
    let mut issues = Vec::new();
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for trail in trails {
        if trail.len() == 1 {
            issues.push(TrailIssue::SinglePoint {
                name: trail.name().to_string(),
            });
        } else {
            let endpoint_gap = trail.endpoint_gap();
            if endpoint_gap < config.tolerance {
                issues.push(TrailIssue::VeryShort {
                    name: trail.name().to_string(),
                    endpoint_gap,
                });
            }
        }

        let count = name_counts.entry(trail.name()).or_insert(0);
        if *count == 0 {
            first_seen.push(trail.name());
        }
        *count += 1;
    }

    for name in first_seen {
        let count = name_counts[name];
        if count > 1 {
            issues.push(TrailIssue::DuplicateName {
                name: name.to_string(),
                count,
            });
        }
    }

    issues
}
