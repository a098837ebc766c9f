//! Lloyd's relaxation for scattered sites
//!
//! Repeatedly moves each movable site to the centroid of its bounded Voronoi
//! cell, evening out clumps left by uniform random scattering.

use log::debug;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::sites::ExclusionZone;
use super::voronoi::voronoi_cells;
use crate::geometry::Point;

/// Options for Lloyd's relaxation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Stop once the largest displacement falls below this fraction of the
    /// box diagonal (0.0 disables early termination)
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            convergence_threshold: 0.01,
        }
    }
}

/// Relax every point for `iterations` rounds inside `[min, max]`
pub fn lloyd_relaxation(points: Vec<Point>, min: Point, max: Point, iterations: usize) -> Vec<Point> {
    let movable = vec![true; points.len()];
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, &movable, min, max, &[], options)
}

/// Relax the points flagged in `movable`, keeping them out of `zones`
///
/// Fixed points still shape their neighbours' cells but never move. A move
/// that would land inside an exclusion zone is skipped for that iteration.
pub fn lloyd_relaxation_with_options(
    mut points: Vec<Point>,
    movable: &[bool],
    min: Point,
    max: Point,
    zones: &[ExclusionZone],
    options: LloydOptions,
) -> Vec<Point> {
    let convergence_threshold = options.convergence_threshold * min.distance(max);
    let total_start = Instant::now();

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();
        let cells = voronoi_cells(&points, min, max);

        let mut max_displacement: f64 = 0.0;
        for cell in &cells {
            if !movable.get(cell.site).copied().unwrap_or(false) {
                continue;
            }
            let target = cell.polygon.centroid(Point::ZERO);
            if zones.iter().any(|zone| zone.contains(target)) {
                continue;
            }
            max_displacement = max_displacement.max(points[cell.site].distance(target));
            points[cell.site] = target;
        }
        iterations_run = iteration + 1;

        debug!(
            "[Lloyd] Iter {}: cells={}, time={:?}, max_disp={:.4}",
            iteration + 1,
            cells.len(),
            iter_start.elapsed(),
            max_displacement
        );

        if convergence_threshold > 0.0 && max_displacement < convergence_threshold {
            converged = true;
            break;
        }
    }

    debug!(
        "[Lloyd] Finished: {} iterations (of max {}), converged={}, total={:?}",
        iterations_run,
        options.max_iterations,
        converged,
        total_start.elapsed()
    );

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sites::scatter_points;

    fn nearest_neighbour_min(points: &[Point]) -> f64 {
        let mut best = f64::INFINITY;
        for (i, a) in points.iter().enumerate() {
            for b in points.iter().skip(i + 1) {
                best = best.min(a.distance(*b));
            }
        }
        best
    }

    #[test]
    fn test_relaxation_spreads_points() {
        let points = scatter_points(40, Point::ZERO, Point::splat(200.0), 42, &[]);
        let before = nearest_neighbour_min(&points);
        let relaxed = lloyd_relaxation(points, Point::ZERO, Point::splat(200.0), 5);

        assert_eq!(relaxed.len(), 40);
        assert!(nearest_neighbour_min(&relaxed) > before);
        for p in &relaxed {
            assert!(p.x >= 0.0 && p.x <= 200.0 && p.y >= 0.0 && p.y <= 200.0);
        }
    }

    #[test]
    fn test_relaxation_determinism() {
        let points = scatter_points(30, Point::ZERO, Point::splat(100.0), 12345, &[]);
        let a = lloyd_relaxation(points.clone(), Point::ZERO, Point::splat(100.0), 3);
        let b = lloyd_relaxation(points, Point::ZERO, Point::splat(100.0), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_points_and_zones() {
        let points = vec![
            Point::new(10.0, 10.0),
            Point::new(12.0, 11.0),
            Point::new(90.0, 90.0),
        ];
        let movable = [false, true, true];
        let zone = ExclusionZone::new(Point::new(75.0, 75.0), 30.0);
        let options = LloydOptions {
            max_iterations: 4,
            convergence_threshold: 0.0,
        };

        let relaxed = lloyd_relaxation_with_options(
            points.clone(),
            &movable,
            Point::ZERO,
            Point::splat(100.0),
            &[zone],
            options,
        );

        assert_eq!(relaxed[0], points[0]);
        assert_ne!(relaxed[1], points[1]);
        for p in &relaxed[1..] {
            assert!(!zone.contains(*p) || *p == points[2]);
        }
    }

    #[test]
    fn test_lloyd_options_default() {
        let options = LloydOptions::default();
        assert_eq!(options.max_iterations, 5);
        assert!((options.convergence_threshold - 0.01).abs() < 1e-12);
    }
}
