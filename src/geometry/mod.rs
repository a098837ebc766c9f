//! Planar geometry primitives
//!
//! Points, edges and polygons shared by every level of the subdivision tree
//! (district, block, lot), plus the boolean clip used to cut one polygon by
//! another.

mod clip;
mod edge;
mod polygon;

pub use clip::{clip_against, intersect};
pub use edge::{push_unique, Edge, EdgeKey};
pub use polygon::{signed_area, Polygon};

/// A 2D world-plane coordinate
pub type Point = glam::DVec2;

/// Tolerance used for point and edge equality
pub const EPSILON: f64 = 1e-6;
