//! Pairwise endpoint proximity classification.
//!
//! For every unordered pair of trails (i < j in input order), each of the
//! four endpoints is tested against every vertex of the other trail:
//!
//! - `near(p, trail)` holds if some vertex `q` of `trail` has
//!   `euclidean(p, q) < tolerance` (strict, raw coordinate space)
//! - A pair yields a [`CandidateRelationship`] when at least one of the four
//!   tests holds, otherwise nothing
//!
//! Testing against all vertices (not only the other endpoints) is what
//! separates T-intersections from plain endpoint-to-endpoint junctions.
//!
//! Large trails are queried through a [`TrailIndex`] and pairs whose padded
//! bounding boxes are apart are skipped. Neither changes the result.

use std::time::Instant;

use log::{debug, info};

use crate::rtree::TrailIndex;
use crate::{CandidateRelationship, JunctionKind, ProximityConfig, Result, Trail, TrailPoint};

/// Relative padding for the bounding box pre-filter.
const BOUNDS_PADDING: f64 = 1e-9;

/// True if some point of `vertices` is strictly closer than `tolerance`.
///
/// # Example
/// ```
/// use trail_junctions::{is_near, TrailPoint};
///
/// let vertices = [TrailPoint::new(0.0, 0.0), TrailPoint::new(1.0, 0.0)];
/// assert!(is_near(&TrailPoint::new(1.0, 0.00005), &vertices, 0.0001));
/// assert!(!is_near(&TrailPoint::new(1.0, 0.0001), &vertices, 0.0001));
/// ```
pub fn is_near(point: &TrailPoint, vertices: &[TrailPoint], tolerance: f64) -> bool {
    vertices.iter().any(|q| point.distance(q) < tolerance)
}

/// A trail plus its optional vertex index, built once per run.
struct PreparedTrail<'a> {
    trail: &'a Trail,
    index: Option<TrailIndex>,
}

impl<'a> PreparedTrail<'a> {
    fn new(trail: &'a Trail, config: &ProximityConfig) -> Self {
        let index = (trail.len() >= config.min_points_for_index as usize)
            .then(|| TrailIndex::from_trail(trail));
        Self { trail, index }
    }

    fn near(&self, point: &TrailPoint, tolerance: f64) -> bool {
        match &self.index {
            Some(index) => index.any_within(point, tolerance),
            None => is_near(point, self.trail.points(), tolerance),
        }
    }

    /// Near one of this trail's own endpoints.
    fn near_endpoint(&self, point: &TrailPoint, tolerance: f64) -> bool {
        is_near(point, &[self.trail.start(), self.trail.end()], tolerance)
    }
}

fn classify_prepared(
    a: &PreparedTrail,
    b: &PreparedTrail,
    tolerance: f64,
) -> Option<CandidateRelationship> {
    // Strict `<` against a non-negative distance never holds
    if !(tolerance > 0.0) {
        return None;
    }

    let buffer = tolerance * (1.0 + BOUNDS_PADDING);
    if !a.trail.bounds().within_distance(&b.trail.bounds(), buffer) {
        return None;
    }

    let a_start = a.trail.start();
    let a_end = a.trail.end();
    let b_start = b.trail.start();
    let b_end = b.trail.end();

    let trail1_start_near_trail2 = b.near(&a_start, tolerance);
    let trail1_end_near_trail2 = b.near(&a_end, tolerance);
    let trail2_start_near_trail1 = a.near(&b_start, tolerance);
    let trail2_end_near_trail1 = a.near(&b_end, tolerance);

    if !(trail1_start_near_trail2
        || trail1_end_near_trail2
        || trail2_start_near_trail1
        || trail2_end_near_trail1)
    {
        return None;
    }

    // T-intersection: some flagged endpoint touches the other trail only away
    // from that trail's own endpoints
    let interior_contact = (trail1_start_near_trail2 && !b.near_endpoint(&a_start, tolerance))
        || (trail1_end_near_trail2 && !b.near_endpoint(&a_end, tolerance))
        || (trail2_start_near_trail1 && !a.near_endpoint(&b_start, tolerance))
        || (trail2_end_near_trail1 && !a.near_endpoint(&b_end, tolerance));
    let kind = if interior_contact {
        JunctionKind::TIntersection
    } else {
        JunctionKind::Endpoint
    };

    Some(CandidateRelationship {
        trail1: a.trail.name().to_string(),
        trail2: b.trail.name().to_string(),
        trail1_start_near_trail2,
        trail1_end_near_trail2,
        trail2_start_near_trail1,
        trail2_end_near_trail1,
        trail1_start: a_start,
        trail1_end: a_end,
        trail2_start: b_start,
        trail2_end: b_end,
        kind,
    })
}

/// Classify a single pair of trails.
///
/// Returns `None` if none of the four endpoint tests holds.
pub fn classify_pair(
    trail1: &Trail,
    trail2: &Trail,
    config: &ProximityConfig,
) -> Option<CandidateRelationship> {
    let a = PreparedTrail::new(trail1, config);
    let b = PreparedTrail::new(trail2, config);
    classify_prepared(&a, &b, config.tolerance)
}

/// Compare every unordered pair of trails and collect candidate relationships.
///
/// Pairs are enumerated as (i, j) with i < j in input order; the output keeps
/// that order. Never fails: a zero (or negative) tolerance yields no candidates.
pub fn find_candidates(trails: &[Trail], config: &ProximityConfig) -> Vec<CandidateRelationship> {
    let start = Instant::now();
    let prepared: Vec<PreparedTrail> = trails
        .iter()
        .map(|t| PreparedTrail::new(t, config))
        .collect();

    let mut candidates = Vec::new();
    for (i, a) in prepared.iter().enumerate() {
        for b in &prepared[i + 1..] {
            if let Some(candidate) = classify_prepared(a, b, config.tolerance) {
                debug!(
                    "[Junctions] {} <-> {}: {} ({} flags)",
                    candidate.trail1,
                    candidate.trail2,
                    candidate.kind,
                    candidate.flag_count()
                );
                candidates.push(candidate);
            }
        }
    }

    info!(
        "[Junctions] Compared {} pairs of {} trails: {} candidates in {}ms",
        pair_count(trails.len()),
        trails.len(),
        candidates.len(),
        start.elapsed().as_millis()
    );

    candidates
}

/// Parallel version of [`find_candidates`].
///
/// The outer trail index is spread across the rayon pool. Output order is
/// identical to the sequential enumeration.
#[cfg(feature = "parallel")]
pub fn find_candidates_parallel(
    trails: &[Trail],
    config: &ProximityConfig,
) -> Vec<CandidateRelationship> {
    use rayon::prelude::*;

    let start = Instant::now();
    let tolerance = config.tolerance;
    let prepared: Vec<PreparedTrail> = trails
        .par_iter()
        .map(|t| PreparedTrail::new(t, config))
        .collect();

    let prepared = &prepared;
    let candidates: Vec<CandidateRelationship> = (0..prepared.len())
        .into_par_iter()
        .flat_map_iter(move |i| {
            let a = &prepared[i];
            prepared[i + 1..]
                .iter()
                .filter_map(move |b| classify_prepared(a, b, tolerance))
        })
        .collect();

    info!(
        "[Junctions] Compared {} pairs of {} trails (parallel): {} candidates in {}ms",
        pair_count(trails.len()),
        trails.len(),
        candidates.len(),
        start.elapsed().as_millis()
    );

    candidates
}

/// Validate the configuration, then classify all pairs.
///
/// Uses the parallel path when the `parallel` feature is enabled.
pub fn classify_trails(
    trails: &[Trail],
    config: &ProximityConfig,
) -> Result<Vec<CandidateRelationship>> {
    config.validate()?;

    #[cfg(feature = "parallel")]
    let candidates = find_candidates_parallel(trails, config);
    #[cfg(not(feature = "parallel"))]
    let candidates = find_candidates(trails, config);

    Ok(candidates)
}

fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
