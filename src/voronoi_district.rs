//! Districts subdivided by a Voronoi tessellation of seed sites

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::block::Block;
use crate::config::GenerationConfig;
use crate::district::District;
use crate::error::Result;
use crate::generation::{
    circle_points, lloyd_relaxation_with_options, scatter_points, voronoi_cells, ExclusionZone,
    LloydOptions, Site, SiteKind,
};
use crate::geometry::{clip_against, push_unique, Edge, Point, EPSILON};
use crate::height::{HeightProvider, RandomHeight};

/// Exclusion radius registered around a circle's center, relative to its radius
const CIRCLE_EXCLUSION_FACTOR: f64 = 1.5;

/// A district whose blocks are the Voronoi cells of its sites
///
/// # Example
///
/// ```rust
/// use district_gen::*;
///
/// let vertices = vec![
///     Point::new(0.0, 0.0),
///     Point::new(300.0, 0.0),
///     Point::new(300.0, 300.0),
///     Point::new(0.0, 300.0),
/// ];
/// let mut district = VoronoiDistrict::new(vertices, Point::splat(150.0), 42).unwrap();
/// district.add_circle(Point::splat(150.0), 60.0, 0.0, 6);
/// district.add_random_sites(20, 7);
/// district.generate_blocks();
///
/// assert!(!district.district.blocks.is_empty());
/// assert!(district.district.lots().all(|lot| lot.is_valid()));
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiDistrict {
    /// Boundary, seed and generated content
    pub district: District,
    /// Generation parameters
    pub config: GenerationConfig,
    sites: Vec<Site>,
    exclusion: Vec<ExclusionZone>,
    no_split: Vec<Point>,
}

impl VoronoiDistrict {
    /// Create a district with the default configuration and no sites
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` for an unusable boundary (see [`District::new`]).
    pub fn new(vertices: Vec<Point>, center: Point, seed: u64) -> Result<Self> {
        Ok(Self {
            district: District::new(vertices, center, seed)?,
            config: GenerationConfig::default(),
            sites: Vec::new(),
            exclusion: Vec::new(),
            no_split: Vec::new(),
        })
    }

    /// Replace the generation configuration
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// All sites in insertion order
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Registered exclusion zones
    #[inline]
    pub fn exclusion_zones(&self) -> &[ExclusionZone] {
        &self.exclusion
    }

    /// Add a site
    ///
    /// With `split == false` the block grown from this site becomes a single
    /// lot. With `exclusion == true` an exclusion zone of `radius` is
    /// registered around the site. Returns the site id.
    pub fn add_site(&mut self, pos: Point, split: bool, exclusion: bool, radius: f64) -> usize {
        if !split {
            self.no_split.push(pos);
        }
        if exclusion {
            self.add_exclusion_zone(pos, radius);
        }
        self.push_site(pos, SiteKind::Explicit)
    }

    /// Register an area random sites must avoid
    pub fn add_exclusion_zone(&mut self, center: Point, radius: f64) {
        self.exclusion.push(ExclusionZone::new(center, radius));
    }

    /// Add a ring of `point_count` sites plus one at the center
    ///
    /// An exclusion zone of `radius * 1.5` around the center keeps random
    /// sites from crowding the ring.
    pub fn add_circle(&mut self, center: Point, radius: f64, rotation: f64, point_count: usize) {
        for p in circle_points(center, radius, rotation, point_count) {
            self.push_site(p, SiteKind::Circle);
        }
        self.push_site(center, SiteKind::Circle);
        self.add_exclusion_zone(center, radius * CIRCLE_EXCLUSION_FACTOR);
    }

    /// Scatter up to `count` sites over the district's bounding box
    ///
    /// Candidates inside an exclusion zone are dropped, not redrawn. Returns
    /// the number of sites added.
    pub fn add_random_sites(&mut self, count: usize, seed: u64) -> usize {
        let Some((min, max)) = self.district.polygon.bounds() else {
            return 0;
        };
        let points = scatter_points(count, min, max, seed, &self.exclusion);
        let added = points.len();
        for p in points {
            self.push_site(p, SiteKind::Random);
        }
        debug!("scattered {} of {} random sites", added, count);
        added
    }

    /// Relax the randomly scattered sites in place with Lloyd's algorithm
    pub fn relax_sites(&mut self, options: LloydOptions) {
        let relaxed = self.relaxed_positions(options);
        for (site, position) in self.sites.iter_mut().zip(relaxed) {
            site.position = position;
        }
    }

    /// Generate blocks and lots using the config's random height provider
    pub fn generate_blocks(&mut self) {
        let heights = RandomHeight::from_config(&self.config);
        self.generate_blocks_with(&heights);
    }

    /// Generate blocks, curbs, roads and lots, replacing earlier output
    ///
    /// 1. Tessellate the sites inside the district bounds padded by
    ///    `voronoi_margin`.
    /// 2. Inset every cell by `block_inset`; flag cells of no-split sites.
    /// 3. Clip the cells by a copy of the boundary inset by `district_inset`.
    /// 4. Collect block edges as curbs and cell edges (clipped to the
    ///    boundary) as roads, without duplicates.
    /// 5. Sort blocks by distance to the district center and give each a
    ///    seed drawn in that order from the district seed.
    ///
    /// Sites are relaxed on a copy when `config.lloyd` asks for iterations,
    /// so repeated calls produce identical output.
    pub fn generate_blocks_with<H>(&mut self, heights: &H)
    where
        H: HeightProvider + ?Sized,
    {
        let config = self.config;
        let Some((min, max)) = self.district.polygon.bounds() else {
            return;
        };
        let pad = Point::splat(config.voronoi_margin);

        let positions = if config.lloyd.max_iterations > 0 {
            self.relaxed_positions(config.lloyd)
        } else {
            self.sites.iter().map(|s| s.position).collect()
        };

        let boundary = self.district.polygon.shrink(config.district_inset);
        let mut roads: Vec<Edge> = Vec::new();
        let mut blocks: Vec<Block> = Vec::new();

        let cells = voronoi_cells(&positions, min - pad, max + pad);
        for cell in &cells {
            for piece in clip_against(&cell.polygon, &self.district.polygon, |p| p) {
                for edge in piece.edges() {
                    push_unique(&mut roads, edge);
                }
            }
        }

        if boundary.len() < 3 {
            warn!(
                "district seed {}: boundary collapses under a {} inset; no blocks generated",
                self.district.seed, config.district_inset
            );
        } else {
            for cell in &cells {
                let mut candidate = Block::new(cell.polygon.shrink(config.block_inset), config.block_options);
                if candidate.polygon.len() < 3 {
                    continue;
                }
                let site = positions[cell.site];
                candidate.dont_split = self.no_split.iter().any(|p| p.abs_diff_eq(site, EPSILON));

                blocks.extend(clip_against(&candidate.polygon, &boundary, |p| candidate.with_polygon(p)));
            }
        }

        let mut curbs: Vec<Edge> = Vec::new();
        for block in &blocks {
            for edge in block.polygon.edges() {
                push_unique(&mut curbs, edge);
            }
        }

        let center = self.district.polygon.center;
        blocks.sort_by(|a, b| {
            a.polygon
                .center
                .distance_squared(center)
                .total_cmp(&b.polygon.center.distance_squared(center))
        });

        let mut rng = ChaCha8Rng::seed_from_u64(self.district.seed);
        for block in &mut blocks {
            let block_seed: u64 = rng.gen();
            block.generate_lots(block_seed, &config, heights);
        }

        debug!(
            "district seed {}: {} sites, {} blocks, {} lots, {} curbs, {} roads",
            self.district.seed,
            self.sites.len(),
            blocks.len(),
            blocks.iter().map(Block::lot_count).sum::<usize>(),
            curbs.len(),
            roads.len()
        );

        self.district.set_generated(blocks, roads, curbs);
    }

    fn push_site(&mut self, position: Point, kind: SiteKind) -> usize {
        let id = self.sites.len();
        self.sites.push(Site { id, position, kind });
        id
    }

    fn relaxed_positions(&self, options: LloydOptions) -> Vec<Point> {
        let positions: Vec<Point> = self.sites.iter().map(|s| s.position).collect();
        let Some((min, max)) = self.district.polygon.bounds() else {
            return positions;
        };
        let movable: Vec<bool> = self.sites.iter().map(|s| s.kind == SiteKind::Random).collect();
        lloyd_relaxation_with_options(positions, &movable, min, max, &self.exclusion, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::push_unique;
    use crate::height::FixedHeight;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    fn busy_district(seed: u64) -> VoronoiDistrict {
        let mut district = VoronoiDistrict::new(square(400.0), Point::splat(200.0), seed).unwrap();
        district.add_circle(Point::splat(200.0), 50.0, 0.3, 6);
        district.add_site(Point::new(60.0, 340.0), false, true, 40.0);
        district.add_random_sites(25, seed.wrapping_add(1));
        district
    }

    #[test]
    fn test_single_site_district() {
        let mut district = VoronoiDistrict::new(square(100.0), Point::splat(50.0), 42).unwrap();
        district.add_site(Point::splat(50.0), true, false, 0.0);
        district.generate_blocks();

        let d = &district.district;
        assert_eq!(d.blocks.len(), 1);
        assert!((d.blocks[0].polygon.area() - 88.0 * 88.0).abs() < 1e-4);
        assert_eq!(d.curbs.len(), 4);
        assert_eq!(d.roads.len(), 4);
        assert!(d.lot_count() > 0);
        assert!(d.lots().all(|lot| lot.is_valid()));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut a = busy_district(42);
        let mut b = busy_district(42);
        a.generate_blocks();
        b.generate_blocks();

        assert!(a.district.lot_count() > 0);
        let lots_a: Vec<_> = a.district.lots().cloned().collect();
        let lots_b: Vec<_> = b.district.lots().cloned().collect();
        assert_eq!(lots_a, lots_b);
        assert_eq!(a.district.curbs, b.district.curbs);

        // Regenerating the same district reproduces it too
        a.generate_blocks();
        let again: Vec<_> = a.district.lots().cloned().collect();
        assert_eq!(lots_a, again);
    }

    #[test]
    fn test_every_lot_is_valid() {
        let mut district = busy_district(7);
        district.generate_blocks();
        for block in &district.district.blocks {
            for lot in &block.lots {
                assert!(lot.is_valid(), "invalid lot {:?}", lot.polygon.vertices);
            }
        }
    }

    #[test]
    fn test_curbs_have_no_duplicates() {
        let mut district = busy_district(3);
        district.generate_blocks();

        let curbs = &district.district.curbs;
        assert!(!curbs.is_empty());
        let mut rebuilt = Vec::new();
        for edge in curbs {
            assert!(push_unique(&mut rebuilt, edge.reversed()));
        }
    }

    #[test]
    fn test_blocks_sorted_by_distance_to_center() {
        let mut district = busy_district(11);
        district.generate_blocks();

        let center = district.district.polygon.center;
        let distances: Vec<f64> = district
            .district
            .blocks
            .iter()
            .map(|b| b.polygon.center.distance(center))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_boundary_is_not_modified() {
        let mut district = busy_district(5);
        let before = district.district.polygon.clone();
        district.generate_blocks();
        assert_eq!(district.district.polygon, before);
    }

    #[test]
    fn test_blocks_stay_inside_inset_boundary() {
        let mut district = busy_district(9);
        district.generate_blocks();
        for block in &district.district.blocks {
            for v in &block.polygon.vertices {
                assert!(v.x >= 6.0 - 1e-3 && v.x <= 394.0 + 1e-3);
                assert!(v.y >= 6.0 - 1e-3 && v.y <= 394.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_collapsed_boundary_keeps_roads_without_blocks() {
        // A 10 unit square vanishes under the default 6 unit district inset
        let mut district = VoronoiDistrict::new(square(10.0), Point::splat(5.0), 4).unwrap();
        district.add_site(Point::splat(5.0), true, false, 0.0);
        district.generate_blocks();

        let d = &district.district;
        assert!(d.blocks.is_empty());
        assert!(d.curbs.is_empty());
        assert_eq!(d.lot_count(), 0);
        assert_eq!(d.roads.len(), 4);
        #[cfg(feature = "spatial-index")]
        assert_eq!(d.find_block_at(Point::splat(5.0)), None);
    }

    #[test]
    fn test_no_split_site_yields_single_lot() {
        let mut district = VoronoiDistrict::new(square(200.0), Point::splat(100.0), 1).unwrap();
        district.add_site(Point::new(50.0, 100.0), false, false, 0.0);
        district.add_site(Point::new(150.0, 100.0), true, false, 0.0);
        district.generate_blocks_with(&FixedHeight(15.0));

        let blocks = &district.district.blocks;
        assert_eq!(blocks.len(), 2);
        let single = blocks.iter().find(|b| b.dont_split).unwrap();
        let grid = blocks.iter().find(|b| !b.dont_split).unwrap();

        assert!(single.polygon.center.x < 100.0);
        assert_eq!(single.lots.len(), 1);
        assert!(grid.lots.len() > 1);
        assert!(district.district.lots().all(|lot| lot.build_height == 15.0));
    }

    #[test]
    fn test_add_circle() {
        let mut district = VoronoiDistrict::new(square(200.0), Point::splat(100.0), 1).unwrap();
        district.add_circle(Point::splat(100.0), 40.0, 0.0, 5);

        assert_eq!(district.sites().len(), 6);
        assert_eq!(district.sites()[5].position, Point::splat(100.0));
        assert!(district.sites().iter().all(|s| s.kind == SiteKind::Circle));
        assert_eq!(district.exclusion_zones().len(), 1);
        assert_eq!(district.exclusion_zones()[0].radius, 60.0);
    }

    #[test]
    fn test_random_sites_respect_exclusion() {
        let mut district = VoronoiDistrict::new(square(300.0), Point::splat(150.0), 1).unwrap();
        district.add_circle(Point::splat(150.0), 40.0, 0.0, 8);
        district.add_site(Point::new(40.0, 40.0), true, true, 35.0);
        let added = district.add_random_sites(200, 99);

        assert!(added > 0 && added < 200);
        let zones = district.exclusion_zones().to_vec();
        for site in district.sites().iter().filter(|s| s.kind == SiteKind::Random) {
            for zone in &zones {
                assert!(site.position.distance(zone.center) >= zone.radius);
            }
        }
    }

    #[test]
    fn test_relaxation_keeps_fixed_sites() {
        let mut district = busy_district(21);
        let before: Vec<Site> = district.sites().to_vec();
        district.relax_sites(LloydOptions::default());

        for (old, new) in before.iter().zip(district.sites()) {
            if old.kind != SiteKind::Random {
                assert_eq!(old.position, new.position);
            }
        }
        assert!(before.iter().zip(district.sites()).any(|(o, n)| o.position != n.position));
    }

    #[test]
    fn test_generate_with_lloyd_config() {
        let config = crate::config::GenerationConfigBuilder::new()
            .lloyd(LloydOptions {
                max_iterations: 3,
                convergence_threshold: 0.0,
            })
            .unwrap()
            .build();
        let mut district = busy_district(13).with_config(config);
        let sites_before: Vec<Site> = district.sites().to_vec();
        district.generate_blocks();

        assert!(district.district.lot_count() > 0);
        assert_eq!(district.sites(), &sites_before[..]);
    }
}
