//! Nearest-block lookups
//!
//! This module is only available with the `spatial-index` feature.

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// 2D KD-tree over block centers
///
/// Built once after a district generates its blocks, so markers and spawn
/// logic can map a world position to the nearest block in O(log n).
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

impl SpatialIndex {
    /// Build an index over `centers`; `None` when there is nothing to index
    ///
    /// # Example
    ///
    /// ```
    /// use district_gen::{Point, SpatialIndex};
    ///
    /// let centers = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
    /// let index = SpatialIndex::new(&centers).unwrap();
    /// assert_eq!(index.find_nearest(Point::new(70.0, 5.0)), 1);
    /// ```
    pub fn new(centers: &[Point]) -> Option<Self> {
        if centers.is_empty() {
            return None;
        }
        let points: Vec<[f64; 2]> = centers.iter().map(|c| [c.x, c.y]).collect();
        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        })
    }

    /// Index of the center nearest to `position`
    pub fn find_nearest(&self, position: Point) -> usize {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        result.item as usize
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex").finish_non_exhaustive()
    }
}
