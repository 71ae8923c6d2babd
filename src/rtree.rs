//! R-tree indexed trail vertices for "any vertex within tolerance" queries.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::{Trail, TrailPoint};

/// Relative padding on the search radius; hits are re-checked exactly.
const RADIUS_PADDING: f64 = 1e-9;

/// A trail vertex with its index for R-tree queries
#[derive(Debug, Clone, Copy)]
pub struct IndexedVertex {
    pub idx: usize,
    pub x: f64,
    pub y: f64,
}

impl IndexedVertex {
    fn point(&self) -> TrailPoint {
        TrailPoint::new(self.x, self.y)
    }
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over one trail's vertices.
///
/// Answers the same question as a linear scan: is there a vertex whose
/// Euclidean distance to the query point is strictly less than the tolerance.
#[derive(Debug, Clone)]
pub struct TrailIndex {
    tree: RTree<IndexedVertex>,
}

impl TrailIndex {
    /// Build an index from points.
    pub fn build(points: &[TrailPoint]) -> Self {
        let indexed: Vec<IndexedVertex> = points
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedVertex {
                idx: i,
                x: p.x,
                y: p.y,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Build an index over all vertices of a trail.
    pub fn from_trail(trail: &Trail) -> Self {
        Self::build(trail.points())
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// True if any indexed vertex is strictly closer than `tolerance`.
    pub fn any_within(&self, point: &TrailPoint, tolerance: f64) -> bool {
        self.first_within(point, tolerance).is_some()
    }

    /// Index of some vertex strictly closer than `tolerance`, if any.
    fn first_within(&self, point: &TrailPoint, tolerance: f64) -> Option<usize> {
        // Also rejects NaN
        if !(tolerance > 0.0) {
            return None;
        }
        let radius = tolerance * (1.0 + RADIUS_PADDING);
        self.tree
            .locate_within_distance([point.x, point.y], radius * radius)
            .find(|v| v.point().distance(point) < tolerance)
            .map(|v| v.idx)
    }
}
