//! Blocks: Voronoi-derived regions subdivided into a grid of lots

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{BlockOptions, GenerationConfig};
use crate::geometry::{clip_against, Polygon};
use crate::height::HeightProvider;
use crate::lot::Lot;

/// Vertices closer than `lot_inset * MERGE_FACTOR` are merged before gridding
const MERGE_FACTOR: f64 = 1.2;

/// A mid-level region of a district
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block outline (already inset from its Voronoi cell)
    pub polygon: Polygon,
    /// Lots produced by the last call to [`Block::generate_lots`]
    pub lots: Vec<Lot>,
    /// Emit a single lot for the whole block instead of a grid
    pub dont_split: bool,
    /// Grid options
    pub options: BlockOptions,
}

impl Block {
    /// Create an empty block
    pub fn new(polygon: Polygon, options: BlockOptions) -> Self {
        Self {
            polygon,
            lots: Vec::new(),
            dont_split: false,
            options,
        }
    }

    /// Same flags and options, different outline
    pub fn with_polygon(&self, polygon: Polygon) -> Self {
        Self {
            polygon,
            lots: Vec::new(),
            dont_split: self.dont_split,
            options: self.options,
        }
    }

    /// Number of lots
    #[inline]
    pub fn lot_count(&self) -> usize {
        self.lots.len()
    }

    /// Subdivide the block into lots, replacing any previous lots
    ///
    /// A `dont_split` block becomes one lot inset by `config.lot_inset`.
    /// Otherwise the block is covered by a grid whose cell width and height
    /// are drawn (in that order) from the block's seeded generator; each cell
    /// clips the block, the pieces are inset, and each inset piece is clipped
    /// by its cell again to remove overshoot. Only lots passing
    /// [`Lot::is_valid_with`] are kept. Heights come from `heights`, which
    /// shares the same generator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use district_gen::*;
    ///
    /// let polygon = Polygon::rect(Point::new(0.0, 0.0), Point::new(90.0, 90.0));
    /// let mut block = Block::new(polygon, BlockOptions::default());
    /// block.generate_lots(7, &GenerationConfig::default(), &RandomHeight::default());
    ///
    /// assert!(block.lot_count() >= 4);
    /// assert!(block.lots.iter().all(|lot| lot.is_valid()));
    /// ```
    pub fn generate_lots<H>(&mut self, seed: u64, config: &GenerationConfig, heights: &H)
    where
        H: HeightProvider + ?Sized,
    {
        self.lots.clear();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        if self.dont_split {
            let footprint = self.polygon.shrink(config.lot_inset);
            self.push_lot(Lot::new(footprint), config, heights, &mut rng);
            return;
        }

        let boundary = self
            .polygon
            .merge_close_vertices(config.lot_inset * MERGE_FACTOR);
        if boundary.len() < 3 {
            return;
        }

        for cell in self.grid_cells(&boundary, &mut rng) {
            for raw in clip_against(&boundary, &cell, |piece| piece) {
                let shrunk = raw.shrink(config.lot_inset);
                if !Lot::new(shrunk.clone()).is_valid_with(config.min_lot_area) {
                    continue;
                }
                for lot in clip_against(&shrunk, &cell, Lot::new) {
                    self.push_lot(lot, config, heights, &mut rng);
                }
            }
        }

        debug!(
            "block at ({:.1}, {:.1}): {} lots",
            self.polygon.center.x,
            self.polygon.center.y,
            self.lots.len()
        );
    }

    fn push_lot<H>(&mut self, mut lot: Lot, config: &GenerationConfig, heights: &H, rng: &mut ChaCha8Rng)
    where
        H: HeightProvider + ?Sized,
    {
        if !lot.is_valid_with(config.min_lot_area) {
            return;
        }
        lot.build_height = heights.build_height(&lot.polygon, rng);
        self.lots.push(lot);
    }

    /// Rectangular grid covering `boundary`, optionally aligned with its longest edge
    fn grid_cells(&self, boundary: &Polygon, rng: &mut ChaCha8Rng) -> Vec<Polygon> {
        let pivot = boundary.center;
        let angle = if self.options.allow_rotation {
            boundary
                .longest_edge()
                .map(|edge| {
                    let dir = edge.b - edge.a;
                    dir.y.atan2(dir.x)
                })
                .unwrap_or(0.0)
        } else {
            0.0
        };

        let frame = boundary.rotated(-angle, pivot);
        let Some((min, max)) = frame.bounds() else {
            return Vec::new();
        };
        let extent = max - min;

        // Width is drawn before height
        let cell_w = self.draw_cell_size(rng);
        let cell_h = self.draw_cell_size(rng);
        let cols = ((extent.x / cell_w).ceil() as usize).max(1);
        let rows = ((extent.y / cell_h).ceil() as usize).max(1);
        let step = glam::DVec2::new(extent.x / cols as f64, extent.y / rows as f64);

        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let lo = min + step * glam::DVec2::new(col as f64, row as f64);
                let hi = lo + step;
                let mut cell = Polygon::rect(lo, hi);
                if angle != 0.0 {
                    cell.rotate(angle, pivot);
                }
                cells.push(cell);
            }
        }
        cells
    }

    fn draw_cell_size(&self, rng: &mut ChaCha8Rng) -> f64 {
        let BlockOptions {
            cell_size_min,
            cell_size_max,
            ..
        } = self.options;
        if cell_size_min < cell_size_max {
            rng.gen_range(cell_size_min..cell_size_max)
        } else {
            cell_size_min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::height::{FixedHeight, RandomHeight};

    fn square_block(size: f64) -> Block {
        Block::new(
            Polygon::rect(Point::ZERO, Point::splat(size)),
            BlockOptions::default(),
        )
    }

    #[test]
    fn test_dont_split_yields_single_inset_lot() {
        let mut block = square_block(50.0);
        block.dont_split = true;
        block.generate_lots(1, &GenerationConfig::default(), &RandomHeight::default());

        assert_eq!(block.lot_count(), 1);
        let lot = &block.lots[0];
        assert!((lot.polygon.area() - 44.0 * 44.0).abs() < 1e-6);
        assert!((10.0..40.0).contains(&lot.build_height));
    }

    #[test]
    fn test_dont_split_too_small_yields_nothing() {
        let mut block = square_block(6.5);
        block.dont_split = true;
        block.generate_lots(1, &GenerationConfig::default(), &FixedHeight::default());
        assert_eq!(block.lot_count(), 0);
    }

    #[test]
    fn test_grid_lots_are_valid_and_inside() {
        let mut block = square_block(100.0);
        block.generate_lots(42, &GenerationConfig::default(), &RandomHeight::default());

        // 100 / [30, 45) gives 3 or 4 cells per axis
        assert!(block.lot_count() >= 9 && block.lot_count() <= 16, "{} lots", block.lot_count());

        let total: f64 = block.lots.iter().map(|l| l.polygon.area().abs()).sum();
        assert!(total < 100.0 * 100.0);

        for lot in &block.lots {
            assert!(lot.is_valid());
            for v in &lot.polygon.vertices {
                assert!(v.x >= 3.0 - 1e-3 && v.x <= 97.0 + 1e-3);
                assert!(v.y >= 3.0 - 1e-3 && v.y <= 97.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_generate_lots_is_deterministic() {
        let config = GenerationConfig::default();
        let mut a = square_block(120.0);
        let mut b = square_block(120.0);
        a.generate_lots(99, &config, &RandomHeight::default());
        b.generate_lots(99, &config, &RandomHeight::default());

        assert_eq!(a.lots, b.lots);

        // Regenerating replaces rather than appends
        a.generate_lots(99, &config, &RandomHeight::default());
        assert_eq!(a.lots, b.lots);
    }

    #[test]
    fn test_rotated_grid_follows_block_edges() {
        // A square rotated by 45 degrees; an aligned grid covers it exactly
        let mut polygon = Polygon::rect(Point::ZERO, Point::splat(90.0));
        polygon.rotate(std::f64::consts::FRAC_PI_4, Point::splat(45.0));
        let options = BlockOptions {
            allow_rotation: true,
            ..BlockOptions::default()
        };
        let mut block = Block::new(polygon, options);
        block.generate_lots(3, &GenerationConfig::default(), &FixedHeight(20.0));

        assert!(block.lot_count() >= 4);
        for lot in &block.lots {
            assert!(lot.is_valid());
            assert_eq!(lot.build_height, 20.0);
            // Every real edge runs diagonally, like the block's own edges
            for edge in lot.polygon.edges() {
                let d = edge.b - edge.a;
                if d.length() > 1.0 {
                    assert!((d.x.abs() - d.y.abs()).abs() < 1e-3, "edge {:?} not diagonal", d);
                }
            }
        }
    }

    #[test]
    fn test_raised_area_threshold_keeps_lots_valid() {
        let config = crate::config::GenerationConfigBuilder::new()
            .min_lot_area(300.0)
            .unwrap()
            .build();
        let mut block = square_block(100.0);
        block.generate_lots(42, &config, &FixedHeight::default());

        assert!(block.lot_count() > 0);
        for lot in &block.lots {
            assert!(lot.is_valid());
            assert!(lot.polygon.area().abs() >= 300.0);
        }
    }

    #[test]
    fn test_degenerate_block_yields_nothing() {
        let mut block = Block::new(
            Polygon::from_vertices(vec![Point::ZERO, Point::new(1.0, 0.0), Point::new(2.0, 0.5)]),
            BlockOptions::default(),
        );
        block.generate_lots(1, &GenerationConfig::default(), &FixedHeight::default());
        assert!(block.lots.is_empty());
    }
}
