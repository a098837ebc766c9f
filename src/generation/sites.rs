//! Seed site placement
//!
//! Sites are the generators of a district's Voronoi tessellation. They are
//! placed explicitly, on rings, or scattered from a seeded generator while
//! avoiding exclusion zones.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

use crate::geometry::Point;

/// How a site was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    /// Added one at a time by the caller
    Explicit,
    /// Part of a ring (or its center) added by `add_circle`
    Circle,
    /// Scattered by `add_random_sites`; the only kind Lloyd relaxation moves
    Random,
}

/// A Voronoi generator point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Stable identifier (insertion order)
    pub id: usize,
    /// Position in the world plane
    pub position: Point,
    /// Placement method
    pub kind: SiteKind,
}

/// Circular area in which random sites may not be placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    /// Zone center
    pub center: Point,
    /// Zone radius
    pub radius: f64,
}

impl ExclusionZone {
    /// Create a zone
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True when `point` is strictly closer than `radius` to the center
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) < self.radius
    }
}

/// `count` points evenly spaced on a circle, starting at angle `rotation`
pub fn circle_points(center: Point, radius: f64, rotation: f64, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = rotation + TAU * i as f64 / count as f64;
            center + Point::from_angle(angle) * radius
        })
        .collect()
}

/// Draw `count` candidate points uniformly in `[min, max)` and keep those outside every zone
///
/// Rejected candidates are not redrawn, so fewer than `count` points may be
/// returned. Each candidate draws x before y.
pub fn scatter_points(
    count: usize,
    min: Point,
    max: Point,
    seed: u64,
    zones: &[ExclusionZone],
) -> Vec<Point> {
    if !(min.x < max.x && min.y < max.y) {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .filter_map(|_| {
            let x = rng.gen_range(min.x..max.x);
            let y = rng.gen_range(min.y..max.y);
            let candidate = Point::new(x, y);
            (!zones.iter().any(|zone| zone.contains(candidate))).then_some(candidate)
        })
        .collect()
}
