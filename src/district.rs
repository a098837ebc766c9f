//! Districts: top-level regions of the world

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::{Result, WorldGenError};
use crate::geometry::{Edge, Point, Polygon};
use crate::lot::Lot;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A bridge attached to one of this district's edges
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeConnection {
    /// Index into the district's own edge list
    pub edge_idx: usize,
    /// Parametric position along that edge (0..=1)
    pub edge_pos: f64,
    /// Index into the world's bridge list
    pub bridge_idx: usize,
}

/// A manually placed region of the world and everything generated inside it
///
/// The boundary in `polygon` is authoritative and never modified by
/// generation; bridges refer to its edges by index.
#[derive(Debug, Clone)]
pub struct District {
    /// District boundary and nominal center
    pub polygon: Polygon,
    /// Seed for every random choice made inside this district
    pub seed: u64,
    /// Generated blocks, nearest to the center first
    pub blocks: Vec<Block>,
    /// Road center lines between blocks
    pub roads: Vec<Edge>,
    /// Deduplicated block outlines
    pub curbs: Vec<Edge>,
    /// Bridges attached to this district's edges
    pub bridge_connections: Vec<BridgeConnection>,
    /// Player spawn point (defaults to the center)
    pub spawn: Point,
    #[cfg(feature = "spatial-index")]
    block_index: Option<SpatialIndex>,
}

impl District {
    /// Create a district from its boundary ring
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the ring has fewer than 3 vertices,
    /// non-finite coordinates, or zero area.
    pub fn new(vertices: Vec<Point>, center: Point, seed: u64) -> Result<Self> {
        let polygon = Polygon::new(vertices, center);
        if polygon.len() < 3 {
            return Err(WorldGenError::DegenerateGeometry(format!(
                "district boundary has {} vertices",
                polygon.len()
            )));
        }
        if !polygon.is_finite() {
            return Err(WorldGenError::DegenerateGeometry(
                "district boundary has non-finite coordinates".into(),
            ));
        }
        if polygon.area() == 0.0 {
            return Err(WorldGenError::DegenerateGeometry(
                "district boundary has zero area".into(),
            ));
        }

        Ok(Self {
            polygon,
            seed,
            blocks: Vec::new(),
            roads: Vec::new(),
            curbs: Vec::new(),
            bridge_connections: Vec::new(),
            spawn: center,
            #[cfg(feature = "spatial-index")]
            block_index: None,
        })
    }

    /// Boundary edges, in the order bridges index them
    #[inline]
    pub fn edges(&self) -> Vec<Edge> {
        self.polygon.edges()
    }

    /// Record a bridge attached to one of this district's edges
    pub fn add_bridge_connection(&mut self, connection: BridgeConnection) {
        self.bridge_connections.push(connection);
    }

    /// Override the spawn point
    pub fn set_spawn(&mut self, spawn: Point) {
        self.spawn = spawn;
    }

    /// Iterate over every lot of every block
    pub fn lots(&self) -> impl Iterator<Item = &Lot> {
        self.blocks.iter().flat_map(|block| block.lots.iter())
    }

    /// Total number of lots
    pub fn lot_count(&self) -> usize {
        self.blocks.iter().map(Block::lot_count).sum()
    }

    /// Replace the generated content of the district
    pub(crate) fn set_generated(&mut self, blocks: Vec<Block>, roads: Vec<Edge>, curbs: Vec<Edge>) {
        #[cfg(feature = "spatial-index")]
        {
            let centers: Vec<Point> = blocks.iter().map(|b| b.polygon.center).collect();
            self.block_index = SpatialIndex::new(&centers);
        }
        self.blocks = blocks;
        self.roads = roads;
        self.curbs = curbs;
    }

    /// Index of the block whose center is nearest to `position`
    ///
    /// Returns `None` before blocks are generated or when generation produced none.
    #[cfg(feature = "spatial-index")]
    pub fn find_block_at(&self, position: Point) -> Option<usize> {
        self.block_index
            .as_ref()
            .map(|index| index.find_nearest(position))
    }
}
