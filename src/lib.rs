//! # Trail Junctions
//!
//! Endpoint proximity classification for trail networks.
//!
//! This library provides:
//! - Pairwise comparison of trail polylines to find where one trail's endpoint
//!   meets another trail (at its endpoint or at an interior vertex)
//! - T-intersection detection for downstream graph splitting
//! - A GeoJSON adapter that turns feature records into trails
//! - A plain-text summarizer for candidate relationships
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel pair enumeration with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use trail_junctions::{find_candidates, JunctionKind, ProximityConfig, Trail, TrailPoint};
//!
//! let main = Trail::new(
//!     "Mesa Trail",
//!     vec![
//!         TrailPoint::new(0.0, 0.0),
//!         TrailPoint::new(1.0, 0.0),
//!         TrailPoint::new(2.0, 0.0),
//!     ],
//! )
//! .unwrap();
//! let spur = Trail::new(
//!     "Spur",
//!     vec![TrailPoint::new(1.0, 0.0), TrailPoint::new(1.0, 1.0)],
//! )
//! .unwrap();
//!
//! let config = ProximityConfig {
//!     tolerance: 0.01,
//!     ..ProximityConfig::default()
//! };
//! let candidates = find_candidates(&[main, spur], &config);
//!
//! assert_eq!(candidates.len(), 1);
//! assert!(candidates[0].trail2_start_near_trail1);
//! assert_eq!(candidates[0].kind, JunctionKind::TIntersection);
//! ```

use std::fmt;

use geo::{BoundingRect, Coord, LineString};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{JunctionError, OptionExt, Result};

// R-tree over trail vertices
pub mod rtree;
pub use rtree::TrailIndex;

// Pairwise endpoint proximity classifier
pub mod proximity;
#[cfg(feature = "parallel")]
pub use proximity::find_candidates_parallel;
pub use proximity::{classify_pair, classify_trails, find_candidates, is_near};

// GeoJSON feature records -> trails
pub mod features;
pub use features::{
    trails_from_features, trails_from_geojson_lines, trails_from_geojson_str, FeatureCollection,
    FeatureGeometry, TrailFeature,
};

// Human-readable candidate summaries
pub mod report;
pub use report::{log_summary, summarize, CandidateSummary};

// Trail lint (informational only)
pub mod validation;
pub use validation::{lint_trails, TrailIssue};

// ============================================================================
// Core Types
// ============================================================================

/// A point in raw coordinate space (x = longitude, y = latitude for GeoJSON).
///
/// No unit conversion is ever applied. Serializes as `[x, y]`.
///
/// # Example
/// ```
/// use trail_junctions::TrailPoint;
/// let a = TrailPoint::new(0.0, 0.0);
/// let b = TrailPoint::new(3.0, 4.0);
/// assert_eq!(a.distance(&b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
}

impl TrailPoint {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance in raw coordinate units (not geodesic).
    pub fn distance(&self, other: &TrailPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for TrailPoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<TrailPoint> for [f64; 2] {
    fn from(value: TrailPoint) -> Self {
        [value.x, value.y]
    }
}

impl From<TrailPoint> for Coord {
    fn from(value: TrailPoint) -> Self {
        Coord {
            x: value.x,
            y: value.y,
        }
    }
}

impl From<Coord> for TrailPoint {
    fn from(value: Coord) -> Self {
        Self::new(value.x, value.y)
    }
}

impl fmt::Display for TrailPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Axis-aligned bounding box of a trail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from points. `None` if there are no points.
    pub fn from_points(points: &[TrailPoint]) -> Option<Self> {
        let line: LineString = points.iter().copied().map(Coord::from).collect();
        let rect = line.bounding_rect()?;
        Some(Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        })
    }

    /// True if some point of `self` could be closer than `buffer` to some
    /// point of `other`.
    ///
    /// Gaps are computed as coordinate differences, the same way point
    /// distances are, so a pair closer than `buffer` is never rejected.
    pub fn within_distance(&self, other: &Bounds, buffer: f64) -> bool {
        let gap_x = (other.min_x - self.max_x).max(self.min_x - other.max_x);
        let gap_y = (other.min_y - self.max_y).max(self.min_y - other.max_y);
        gap_x < buffer && gap_y < buffer
    }
}

/// A named trail polyline with at least one point.
///
/// The first and last points are the trail's endpoints. A single-point trail
/// has identical start and end.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    name: String,
    points: Vec<TrailPoint>,
    bounds: Bounds,
}

impl Trail {
    /// Create a trail.
    ///
    /// Fails if the name is blank, or if `points` is empty or contains a
    /// non-finite coordinate.
    ///
    /// # Example
    /// ```
    /// use trail_junctions::{Trail, TrailPoint};
    ///
    /// let trail = Trail::new("Loop", vec![TrailPoint::new(0.0, 0.0)]).unwrap();
    /// assert_eq!(trail.start(), trail.end());
    /// assert!(Trail::new("Empty", vec![]).is_err());
    /// assert!(Trail::new(" ", vec![TrailPoint::new(0.0, 0.0)]).is_err());
    /// ```
    pub fn new(name: impl Into<String>, points: Vec<TrailPoint>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(JunctionError::EmptyName);
        }

        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(JunctionError::InvalidCoordinates {
                name,
                message: format!("point {} is ({}, {})", i, p.x, p.y),
            });
        }

        let bounds = Bounds::from_points(&points).ok_or_empty_trail(&name)?;

        Ok(Self {
            name,
            points,
            bounds,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    /// Number of vertices (always at least 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed trail.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> TrailPoint {
        self.points[0]
    }

    pub fn end(&self) -> TrailPoint {
        self.points[self.points.len() - 1]
    }

    /// True if start and end are the same point (loops and single points).
    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Straight-line distance between start and end (zero for loops).
    pub fn endpoint_gap(&self) -> f64 {
        self.start().distance(&self.end())
    }

    /// Convert to a `geo` line string.
    pub fn to_line_string(&self) -> LineString {
        self.points.iter().copied().map(Coord::from).collect()
    }
}

/// Configuration for endpoint proximity classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Maximum (exclusive) Euclidean distance at which two points count as
    /// coincident, in raw coordinate units.
    /// Default: 0.0001 (roughly 10 meters near the calibration latitude of the
    /// source data; not geodesically corrected)
    pub tolerance: f64,

    /// Trails with at least this many vertices are queried through an R-tree
    /// instead of a linear scan. Results are identical either way.
    /// Default: 64
    pub min_points_for_index: u32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.0001,
            min_points_for_index: 64,
        }
    }
}

impl ProximityConfig {
    /// Reject tolerances that are negative or not finite.
    ///
    /// A tolerance of zero is valid; it disables all matching.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(JunctionError::ConfigError {
                message: format!(
                    "tolerance must be a finite non-negative number, got {}",
                    self.tolerance
                ),
            });
        }
        Ok(())
    }
}

/// How a candidate pair meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionKind {
    /// Every flagged endpoint also lies near one of the other trail's endpoints.
    Endpoint,
    /// At least one flagged endpoint only touches interior vertices of the
    /// other trail.
    TIntersection,
}

impl fmt::Display for JunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunctionKind::Endpoint => write!(f, "endpoint junction"),
            JunctionKind::TIntersection => write!(f, "T-intersection"),
        }
    }
}

/// Endpoint proximity relationship between two trails.
///
/// `trail1` precedes `trail2` in input order. Each flag is computed
/// independently; a flag does not imply its reciprocal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRelationship {
    pub trail1: String,
    pub trail2: String,
    pub trail1_start_near_trail2: bool,
    pub trail1_end_near_trail2: bool,
    pub trail2_start_near_trail1: bool,
    pub trail2_end_near_trail1: bool,
    pub trail1_start: TrailPoint,
    pub trail1_end: TrailPoint,
    pub trail2_start: TrailPoint,
    pub trail2_end: TrailPoint,
    pub kind: JunctionKind,
}

impl CandidateRelationship {
    /// The four flags in field order.
    pub fn flags(&self) -> [bool; 4] {
        [
            self.trail1_start_near_trail2,
            self.trail1_end_near_trail2,
            self.trail2_start_near_trail1,
            self.trail2_end_near_trail1,
        ]
    }

    /// Number of flags that hold (1..=4 for any emitted candidate).
    pub fn flag_count(&self) -> usize {
        self.flags().iter().filter(|&&f| f).count()
    }

    /// Same relationship seen from the other trail.
    pub fn swapped(&self) -> Self {
        Self {
            trail1: self.trail2.clone(),
            trail2: self.trail1.clone(),
            trail1_start_near_trail2: self.trail2_start_near_trail1,
            trail1_end_near_trail2: self.trail2_end_near_trail1,
            trail2_start_near_trail1: self.trail1_start_near_trail2,
            trail2_end_near_trail1: self.trail1_end_near_trail2,
            trail1_start: self.trail2_start,
            trail1_end: self.trail2_end,
            trail2_start: self.trail1_start,
            trail2_end: self.trail1_end,
            kind: self.kind,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
