//! Human-readable summaries of candidate relationships.

use std::fmt;

use log::info;
use serde::Serialize;

use crate::{CandidateRelationship, JunctionKind};

impl CandidateRelationship {
    /// The flags that hold, phrased as "<trail> start near <other>".
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(4);
        if self.trail1_start_near_trail2 {
            parts.push(format!("{} start near {}", self.trail1, self.trail2));
        }
        if self.trail1_end_near_trail2 {
            parts.push(format!("{} end near {}", self.trail1, self.trail2));
        }
        if self.trail2_start_near_trail1 {
            parts.push(format!("{} start near {}", self.trail2, self.trail1));
        }
        if self.trail2_end_near_trail1 {
            parts.push(format!("{} end near {}", self.trail2, self.trail1));
        }
        parts
    }
}

/// Console-style summary of a candidate list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub total: usize,
    pub t_intersections: usize,
    pub endpoint_junctions: usize,
    /// One line per shown candidate, in candidate order
    pub entries: Vec<String>,
    /// Candidates not shown because of the limit
    pub truncated: usize,
}

/// Summarize candidates, listing at most `limit` of them.
pub fn summarize(candidates: &[CandidateRelationship], limit: usize) -> CandidateSummary {
    let t_intersections = candidates
        .iter()
        .filter(|c| c.kind == JunctionKind::TIntersection)
        .count();

    let entries = candidates
        .iter()
        .take(limit)
        .map(|c| {
            format!(
                "{} <-> {} ({}): {}",
                c.trail1,
                c.trail2,
                c.kind,
                c.describe().join(", ")
            )
        })
        .collect::<Vec<_>>();

    CandidateSummary {
        total: candidates.len(),
        t_intersections,
        endpoint_junctions: candidates.len() - t_intersections,
        truncated: candidates.len() - entries.len(),
        entries,
    }
}

impl fmt::Display for CandidateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} candidate relationships ({} T-intersections, {} endpoint junctions)",
            self.total, self.t_intersections, self.endpoint_junctions
        )?;
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, entry)?;
        }
        if self.truncated > 0 {
            writeln!(f, "  ... and {} more", self.truncated)?;
        }
        Ok(())
    }
}

/// Log the summary, listing at most `limit` candidates, line by line at
/// info level. Returns the summary that was logged.
pub fn log_summary(candidates: &[CandidateRelationship], limit: usize) -> CandidateSummary {
    let summary = summarize(candidates, limit);
    for line in summary.to_string().lines() {
        info!("[Junctions] {}", line);
    }
    summary
}
