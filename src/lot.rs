//! Lots: terminal buildable polygons

use crate::geometry::Polygon;

/// Height a lot has before any provider touches it
pub const DEFAULT_BUILD_HEIGHT: f64 = 10.0;

/// Smallest area of a buildable lot
pub const MIN_LOT_AREA: f64 = 10.0;

/// A leaf of the subdivision tree: a polygon with a building height
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    /// Lot footprint
    pub polygon: Polygon,
    /// Height of the building placed on this lot
    pub build_height: f64,
}

impl Lot {
    /// Create a lot with the default build height
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            build_height: DEFAULT_BUILD_HEIGHT,
        }
    }

    /// Validity against the default minimum area
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(MIN_LOT_AREA)
    }

    /// A lot is valid when it has at least 3 vertices, all finite, and
    /// `|area| >= min_area`
    pub fn is_valid_with(&self, min_area: f64) -> bool {
        self.polygon.len() >= 3 && self.polygon.is_finite() && self.polygon.area().abs() >= min_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn lot(vertices: &[(f64, f64)]) -> Lot {
        Lot::new(Polygon::from_vertices(
            vertices.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        ))
    }

    #[test]
    fn test_default_height() {
        assert_eq!(lot(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]).build_height, 10.0);
    }

    #[test]
    fn test_validity() {
        assert!(lot(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]).is_valid());
        // Clockwise lots are just as buildable
        assert!(lot(&[(0.0, 0.0), (0.0, 5.0), (5.0, 5.0), (5.0, 0.0)]).is_valid());

        // Area 4.5 is below the threshold
        assert!(!lot(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]).is_valid());
        assert!(!lot(&[(0.0, 0.0), (30.0, 0.0)]).is_valid());
        assert!(!lot(&[(0.0, 0.0), (30.0, f64::INFINITY), (0.0, 30.0)]).is_valid());
        assert!(!Lot::new(Polygon::default()).is_valid());
    }

    #[test]
    fn test_custom_threshold() {
        let small = lot(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]);
        assert!(small.is_valid_with(4.0));
        assert!(!small.is_valid_with(5.0));
    }
}
