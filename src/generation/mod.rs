//! Site placement and tessellation
//!
//! Sites are scattered or placed explicitly, optionally relaxed with Lloyd's
//! algorithm, then tessellated into bounded planar Voronoi cells that become
//! candidate blocks.

mod lloyd;
mod sites;
mod voronoi;

pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use sites::{circle_points, scatter_points, ExclusionZone, Site, SiteKind};
pub use voronoi::{voronoi_cells, VoronoiCell};
