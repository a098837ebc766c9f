//! Seeded district, block and lot layout generation
//!
//! Builds the static ground plan of a city-like world: manually placed
//! districts are tessellated into Voronoi blocks, blocks are cut into grids
//! of building lots, and bridges join districts edge to edge. The result is
//! flattened into a [`WorldDefinition`] for rendering and map code.
//!
//! # Quick Start
//!
//! ```rust
//! use district_gen::*;
//!
//! let vertices = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(100.0, 0.0),
//!     Point::new(100.0, 100.0),
//!     Point::new(0.0, 100.0),
//! ];
//! let config = GenerationConfigBuilder::new()
//!     .cell_size(25.0, 35.0).unwrap()
//!     .build();
//!
//! let mut district = VoronoiDistrict::new(vertices, Point::splat(50.0), 42)
//!     .unwrap()
//!     .with_config(config);
//! district.add_site(Point::splat(50.0), true, false, 0.0);
//!
//! let mut world = WorldGen::new();
//! world.add_district(district);
//! world.generate_world();
//!
//! let definition = world.serialise();
//! println!("{} curbs", definition.districts[0].curbs.len());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) position-to-block lookups using a KD-tree
//! - `serde` (default): serialization of configuration and the world definition
//! - `parallel`: generate districts concurrently with rayon

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod lot;
pub mod block;
pub mod district;
pub mod voronoi_district;
pub mod generation;
pub mod height;
pub mod world;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{WorldGenError, Result};
pub use config::{BlockOptions, GenerationConfig, GenerationConfigBuilder};
pub use geometry::{clip_against, push_unique, signed_area, Edge, EdgeKey, Point, Polygon};
pub use lot::Lot;
pub use block::Block;
pub use district::{BridgeConnection, District};
pub use voronoi_district::VoronoiDistrict;
pub use generation::{ExclusionZone, LloydOptions, Site, SiteKind};
pub use height::{FixedHeight, HeightProvider, PerlinConfig, PerlinHeight, RandomHeight};
pub use world::{Bridge, BridgeDefinition, BridgeEnd, DistrictDefinition, WorldDefinition, WorldGen};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;
