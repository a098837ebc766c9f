//! World orchestration: districts, bridges and the serialised world

use log::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::district::{BridgeConnection, District};
use crate::error::{Result, WorldGenError};
use crate::geometry::{Edge, Point};
use crate::height::HeightProvider;
use crate::voronoi_district::VoronoiDistrict;

/// One side of a bridge: a position along one edge of one district
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeEnd {
    /// Index of the district in the world
    pub district: usize,
    /// Index into that district's boundary edges
    pub edge_idx: usize,
    /// Parametric position along the edge (0..=1)
    pub edge_pos: f64,
}

impl BridgeEnd {
    /// Create a bridge end on edge `edge_idx` of `district`
    pub fn new(district: usize, edge_idx: usize, edge_pos: f64) -> Self {
        Self {
            district,
            edge_idx,
            edge_pos,
        }
    }

    fn resolve(&self, district: &District) -> Result<Point> {
        if !(0.0..=1.0).contains(&self.edge_pos) {
            return Err(WorldGenError::InvalidConfig(format!(
                "edge position must be within 0..=1, got {}",
                self.edge_pos
            )));
        }
        district
            .polygon
            .edge(self.edge_idx)
            .map(|edge| edge.lerp(self.edge_pos))
            .ok_or(WorldGenError::EdgeNotFound {
                district: self.district,
                edge: self.edge_idx,
            })
    }
}

/// An edge-relative connection between two districts
///
/// The path is derived once, when the bridge is built, and then frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bridge {
    /// First side
    pub a: BridgeEnd,
    /// Second side
    pub b: BridgeEnd,
    /// Endpoints on side `a` and side `b`
    pub bridge_path: [Point; 2],
}

impl Bridge {
    /// Build a bridge between `district_a` and `district_b`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an edge position outside `0..=1`, `EdgeNotFound`
    /// for an edge index the district does not have.
    pub fn new(a: BridgeEnd, district_a: &District, b: BridgeEnd, district_b: &District) -> Result<Self> {
        let bridge_path = [a.resolve(district_a)?, b.resolve(district_b)?];
        Ok(Self { a, b, bridge_path })
    }
}

/// Renderer-facing form of a district; blocks and lots are not exported
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictDefinition {
    /// Boundary ring, unchanged by generation
    pub vertices: Vec<Point>,
    /// Nominal district center
    pub center: Point,
    /// Player spawn point
    pub spawn: Point,
    /// Bridges attached to the boundary edges
    pub bridge_connections: Vec<BridgeConnection>,
    /// Road center lines
    pub roads: Vec<Edge>,
    /// Block outlines
    pub curbs: Vec<Edge>,
}

impl From<&District> for DistrictDefinition {
    fn from(district: &District) -> Self {
        Self {
            vertices: district.polygon.vertices.clone(),
            center: district.polygon.center,
            spawn: district.spawn,
            bridge_connections: district.bridge_connections.clone(),
            roads: district.roads.clone(),
            curbs: district.curbs.clone(),
        }
    }
}

/// Renderer-facing form of a bridge
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeDefinition {
    /// Endpoints on the two connected districts
    pub bridge_path: [Point; 2],
}

/// Static world data handed to rendering and map code
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldDefinition {
    /// One entry per district, in insertion order
    pub districts: Vec<DistrictDefinition>,
    /// One entry per bridge, indexed by `BridgeConnection::bridge_idx`
    pub bridges: Vec<BridgeDefinition>,
}

/// Holds every district and bridge and drives generation across them
///
/// # Example
///
/// ```rust
/// use district_gen::*;
///
/// let square = |x: f64| {
///     vec![
///         Point::new(x, 0.0),
///         Point::new(x + 100.0, 0.0),
///         Point::new(x + 100.0, 100.0),
///         Point::new(x, 100.0),
///     ]
/// };
///
/// let mut world = WorldGen::new();
/// let west = world.add_district(VoronoiDistrict::new(square(0.0), Point::splat(50.0), 1).unwrap());
/// let east = world.add_district(VoronoiDistrict::new(square(150.0), Point::new(200.0, 50.0), 2).unwrap());
/// for id in [west, east] {
///     let center = world.district(id).unwrap().district.polygon.center;
///     world.district_mut(id).unwrap().add_site(center, true, false, 0.0);
/// }
///
/// // Edge 1 of the west square faces edge 3 of the east square
/// world.connect(BridgeEnd::new(west, 1, 0.5), BridgeEnd::new(east, 3, 0.5)).unwrap();
/// world.generate_world();
///
/// let definition = world.serialise();
/// assert_eq!(definition.districts.len(), 2);
/// assert_eq!(definition.bridges[0].bridge_path, [Point::new(100.0, 50.0), Point::new(150.0, 50.0)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WorldGen {
    districts: Vec<VoronoiDistrict>,
    bridges: Vec<Bridge>,
}

impl WorldGen {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a district, returning its index
    pub fn add_district(&mut self, district: VoronoiDistrict) -> usize {
        self.districts.push(district);
        self.districts.len() - 1
    }

    /// Register a bridge and record it on both endpoint districts
    ///
    /// Both ends are resolved again against the registered districts, so a
    /// bridge built from some other district is rejected.
    ///
    /// # Errors
    ///
    /// `DistrictNotFound` if either end names a district that was never added,
    /// `EdgeNotFound` if the edge does not exist on the registered district,
    /// and `InvalidConfig` if the edge position is out of range or the path
    /// does not lie on the registered districts' edges.
    pub fn add_bridge(&mut self, bridge: Bridge) -> Result<usize> {
        let resolved = self.resolve_bridge(bridge.a, bridge.b)?;
        if resolved.bridge_path != bridge.bridge_path {
            return Err(WorldGenError::InvalidConfig(format!(
                "bridge path {:?} does not match the registered districts (expected {:?})",
                bridge.bridge_path, resolved.bridge_path
            )));
        }

        let bridge_idx = self.bridges.len();
        for end in [bridge.a, bridge.b] {
            self.districts[end.district]
                .district
                .add_bridge_connection(BridgeConnection {
                    edge_idx: end.edge_idx,
                    edge_pos: end.edge_pos,
                    bridge_idx,
                });
        }
        self.bridges.push(bridge);
        Ok(bridge_idx)
    }

    /// Build a bridge between two registered districts and add it
    pub fn connect(&mut self, a: BridgeEnd, b: BridgeEnd) -> Result<usize> {
        let bridge = self.resolve_bridge(a, b)?;
        self.add_bridge(bridge)
    }

    fn resolve_bridge(&self, a: BridgeEnd, b: BridgeEnd) -> Result<Bridge> {
        let district_a = self.district(a.district).ok_or(WorldGenError::DistrictNotFound(a.district))?;
        let district_b = self.district(b.district).ok_or(WorldGenError::DistrictNotFound(b.district))?;
        Bridge::new(a, &district_a.district, b, &district_b.district)
    }

    /// All districts in insertion order
    #[inline]
    pub fn districts(&self) -> &[VoronoiDistrict] {
        &self.districts
    }

    /// District by index
    #[inline]
    pub fn district(&self, id: usize) -> Option<&VoronoiDistrict> {
        self.districts.get(id)
    }

    /// Mutable district by index, for adding sites before generation
    #[inline]
    pub fn district_mut(&mut self, id: usize) -> Option<&mut VoronoiDistrict> {
        self.districts.get_mut(id)
    }

    /// All registered bridges
    #[inline]
    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    /// Lots across every district
    pub fn lot_count(&self) -> usize {
        self.districts.iter().map(|d| d.district.lot_count()).sum()
    }

    /// Generate blocks in every district using each district's own config
    ///
    /// Districts only touch their own state, so with the `parallel` feature
    /// they are generated concurrently with identical results.
    pub fn generate_world(&mut self) {
        #[cfg(feature = "parallel")]
        self.districts.par_iter_mut().for_each(|d| d.generate_blocks());
        #[cfg(not(feature = "parallel"))]
        self.districts.iter_mut().for_each(|d| d.generate_blocks());

        self.log_totals();
    }

    /// Generate blocks in every district with a shared height provider
    pub fn generate_world_with<H>(&mut self, heights: &H)
    where
        H: HeightProvider + Sync + ?Sized,
    {
        #[cfg(feature = "parallel")]
        self.districts
            .par_iter_mut()
            .for_each(|d| d.generate_blocks_with(heights));
        #[cfg(not(feature = "parallel"))]
        self.districts
            .iter_mut()
            .for_each(|d| d.generate_blocks_with(heights));

        self.log_totals();
    }

    /// Flatten the world into its renderer-facing form
    pub fn serialise(&self) -> WorldDefinition {
        WorldDefinition {
            districts: self
                .districts
                .iter()
                .map(|d| DistrictDefinition::from(&d.district))
                .collect(),
            bridges: self
                .bridges
                .iter()
                .map(|b| BridgeDefinition {
                    bridge_path: b.bridge_path,
                })
                .collect(),
        }
    }

    fn log_totals(&self) {
        let blocks: usize = self.districts.iter().map(|d| d.district.blocks.len()).sum();
        info!(
            "generated world: {} districts, {} blocks, {} lots, {} bridges",
            self.districts.len(),
            blocks,
            self.lot_count(),
            self.bridges.len()
        );
    }
}
