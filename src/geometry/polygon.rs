//! Polygon value type and its base operations
//!
//! A polygon is an ordered vertex ring (no closing duplicate) plus a nominal
//! center. The center is not necessarily the centroid: for Voronoi blocks it
//! is the generating site.

use super::{Edge, Point, EPSILON};

/// Vertices closer than `margin * SHRINK_MERGE_FACTOR` are merged before insetting
pub const SHRINK_MERGE_FACTOR: f64 = 1.2;

/// Below this cross product two unit edge directions are treated as parallel
const PARALLEL_EPSILON: f64 = 1e-9;

/// Signed shoelace area of a vertex ring
///
/// Positive for counter-clockwise rings (y axis up), negative for clockwise.
pub fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

/// An ordered ring of vertices with a nominal center
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Boundary vertices in ring order
    pub vertices: Vec<Point>,
    /// Nominal origin (site, spawn reference, or centroid)
    pub center: Point,
}

impl Polygon {
    /// Create a polygon with an explicit center
    pub fn new(vertices: Vec<Point>, center: Point) -> Self {
        Self { vertices, center }
    }

    /// Create a polygon whose center is the mean of its vertices
    pub fn from_vertices(vertices: Vec<Point>) -> Self {
        let mut polygon = Self::new(vertices, Point::ZERO);
        polygon.center = polygon.centroid(Point::ZERO);
        polygon
    }

    /// Axis-aligned rectangle, counter-clockwise from `min`
    pub fn rect(min: Point, max: Point) -> Self {
        Self::from_vertices(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// Number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True when the polygon has no vertices (e.g. a collapsed inset)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Signed shoelace area; the sign encodes winding
    #[inline]
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices)
    }

    /// True for counter-clockwise winding
    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.area() > 0.0
    }

    /// Arithmetic mean of the vertices, offset by `translate`
    pub fn centroid(&self, translate: Point) -> Point {
        if self.vertices.is_empty() {
            return translate;
        }
        let sum: Point = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f64 + translate
    }

    /// Consecutive-vertex edges, wrapping last to first
    pub fn edges(&self) -> Vec<Edge> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| Edge::new(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// Edge `idx` (from vertex `idx` to vertex `idx + 1`), if it exists
    pub fn edge(&self, idx: usize) -> Option<Edge> {
        let n = self.vertices.len();
        if idx >= n || n < 2 {
            return None;
        }
        Some(Edge::new(self.vertices[idx], self.vertices[(idx + 1) % n]))
    }

    /// The longest boundary edge
    pub fn longest_edge(&self) -> Option<Edge> {
        self.edges()
            .into_iter()
            .max_by(|a, b| a.length().total_cmp(&b.length()))
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }

    /// True when every coordinate (vertices and center) is finite
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.vertices.iter().all(|v| v.is_finite())
    }

    /// Even-odd point-in-polygon test
    pub fn contains_point(&self, point: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y) {
                let x = vj.x + (point.y - vj.y) / (vi.y - vj.y) * (vi.x - vj.x);
                if point.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Move every vertex and the center by `offset`
    pub fn translate(&mut self, offset: Point) {
        for v in &mut self.vertices {
            *v += offset;
        }
        self.center += offset;
    }

    /// Rotate every vertex and the center by `angle` radians around `origin`
    pub fn rotate(&mut self, angle: f64, origin: Point) {
        let rotation = Point::from_angle(angle);
        for v in &mut self.vertices {
            *v = origin + rotation.rotate(*v - origin);
        }
        self.center = origin + rotation.rotate(self.center - origin);
    }

    /// Rotated copy
    pub fn rotated(&self, angle: f64, origin: Point) -> Self {
        let mut copy = self.clone();
        copy.rotate(angle, origin);
        copy
    }

    /// Copy with the vertex order reversed (flips winding)
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self::new(vertices, self.center)
    }

    /// Copy of the boundary as a plain polygon centered on its centroid
    pub fn vertices_to_polygon(&self) -> Self {
        Self::from_vertices(self.vertices.clone())
    }

    /// Drop vertices that lie within `threshold` of the previously kept vertex
    ///
    /// The ring wraps, so trailing vertices close to the first one are dropped too.
    pub fn merge_close_vertices(&self, threshold: f64) -> Self {
        let threshold = threshold.max(EPSILON);
        let mut kept: Vec<Point> = Vec::with_capacity(self.vertices.len());

        for &v in &self.vertices {
            match kept.last() {
                Some(last) if last.distance(v) <= threshold => {}
                _ => kept.push(v),
            }
        }
        while kept.len() > 1 && kept[0].distance(kept[kept.len() - 1]) <= threshold {
            kept.pop();
        }

        Self::new(kept, self.center)
    }

    /// Inset the polygon by `margin` (negative values grow it)
    ///
    /// Each vertex moves to the intersection of its two adjacent edges after
    /// both are offset inward by `margin`. Inward is derived from the ring's
    /// winding, so either orientation works. Vertices closer than
    /// `margin * 1.2` are merged first.
    ///
    /// Where two consecutive edges are parallel (a straight-through vertex or
    /// a zero-width spike) there is no unique intersection, and the vertex is
    /// offset along the shared inward normal instead.
    ///
    /// If an inset edge comes out pointing against its source edge, the inset
    /// has passed that edge's collapse point. The edge's end vertex is then
    /// removed from the source ring and the inset recomputed. A ring that
    /// drops below three vertices collapses to an empty polygon, which every
    /// validity check rejects.
    pub fn shrink(&self, margin: f64) -> Polygon {
        let merged = self.merge_close_vertices(margin.abs() * SHRINK_MERGE_FACTOR);
        if margin == 0.0 {
            return merged;
        }

        let mut source = merged.vertices;
        loop {
            if source.len() < 3 {
                return Polygon::new(Vec::new(), self.center);
            }

            let orientation = signed_area(&source).signum();
            if orientation == 0.0 || !orientation.is_finite() {
                return Polygon::new(Vec::new(), self.center);
            }

            let inset = offset_ring(&source, margin, orientation);
            if inset.iter().any(|v| !v.is_finite()) {
                return Polygon::new(Vec::new(), self.center);
            }

            match first_flipped_edge(&source, &inset) {
                None => return Polygon::new(inset, self.center),
                Some(i) => {
                    source.remove((i + 1) % source.len());
                }
            }
        }
    }
}

/// Offset every vertex of a ring to the intersection of its shifted neighbour edges
fn offset_ring(vertices: &[Point], margin: f64, orientation: f64) -> Vec<Point> {
    let n = vertices.len();
    let directions: Vec<Point> = (0..n)
        .map(|i| (vertices[(i + 1) % n] - vertices[i]).normalize_or_zero())
        .collect();

    (0..n)
        .map(|i| {
            let prev = directions[(i + n - 1) % n];
            let next = directions[i];

            // Left normal points inward on a counter-clockwise ring
            let p1 = vertices[i] + prev.perp() * orientation * margin;
            let p2 = vertices[i] + next.perp() * orientation * margin;

            let denom = prev.perp_dot(next);
            if denom.abs() < PARALLEL_EPSILON {
                p2
            } else {
                let t = (p2 - p1).perp_dot(next) / denom;
                p1 + prev * t
            }
        })
        .collect()
}

/// Index of the first inset edge whose direction opposes its source edge
fn first_flipped_edge(source: &[Point], inset: &[Point]) -> Option<usize> {
    let n = source.len();
    (0..n).find(|&i| {
        let original = source[(i + 1) % n] - source[i];
        let moved = inset[(i + 1) % n] - inset[i];
        original.dot(moved) <= 0.0
    })
}
