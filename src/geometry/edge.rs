//! Boundary edges and curb deduplication

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Point, EPSILON};

/// Quantized, orientation-independent key for an edge
pub type EdgeKey = ((i64, i64), (i64, i64));

/// An ordered pair of points taken from consecutive polygon vertices
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Start point
    pub a: Point,
    /// End point
    pub b: Point,
}

impl Edge {
    /// Create a new edge from `a` to `b`
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Euclidean length of the edge
    #[inline]
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Point at parametric position `t` (0 = `a`, 1 = `b`)
    #[inline]
    pub fn lerp(&self, t: f64) -> Point {
        self.a.lerp(self.b, t)
    }

    /// Midpoint of the edge
    #[inline]
    pub fn midpoint(&self) -> Point {
        self.lerp(0.5)
    }

    /// The same segment walked the other way
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Orientation-independent equality: `(a, b)` and `(b, a)` are the same segment
    ///
    /// Endpoints are compared per component within `epsilon`.
    pub fn same_segment(&self, other: &Edge, epsilon: f64) -> bool {
        (self.a.abs_diff_eq(other.a, epsilon) && self.b.abs_diff_eq(other.b, epsilon))
            || (self.a.abs_diff_eq(other.b, epsilon) && self.b.abs_diff_eq(other.a, epsilon))
    }

    /// Canonical hash key: both endpoints quantized to `precision` and ordered
    ///
    /// Two edges that are the same segment up to orientation, and whose
    /// endpoints quantize to the same grid cells, share a key. Endpoints that
    /// straddle a quantization boundary do not, so use [`Edge::same_segment`]
    /// when an exact tolerance matters.
    pub fn canonical_key(&self, precision: f64) -> EdgeKey {
        let quantize = |p: Point| ((p.x / precision).round() as i64, (p.y / precision).round() as i64);
        let ka = quantize(self.a);
        let kb = quantize(self.b);
        if ka <= kb {
            (ka, kb)
        } else {
            (kb, ka)
        }
    }
}

/// Append `edge` unless an equal segment (in either orientation) is already present
///
/// Returns `true` when the edge was added.
pub fn push_unique(edges: &mut Vec<Edge>, edge: Edge) -> bool {
    if edges.iter().any(|e| e.same_segment(&edge, EPSILON)) {
        return false;
    }
    edges.push(edge);
    true
}
