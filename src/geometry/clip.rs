//! Boolean polygon clipping
//!
//! Thin wrapper around `geo`'s boolean intersection. Generation is
//! best-effort, so [`clip_against`] swallows failures (logging them) and
//! returns no output instead of aborting.

use geo::{BooleanOps, Coord, LineString, Polygon as GeoPolygon};
use log::{debug, warn};

use super::{Point, Polygon};
use crate::error::{Result, WorldGenError};

/// Intersect `subject` with `clip`, returning the exterior ring of each result piece
///
/// # Errors
///
/// Returns `DegenerateGeometry` if either input has fewer than 3 vertices or
/// non-finite coordinates.
pub fn intersect(subject: &Polygon, clip: &Polygon) -> Result<Vec<Vec<Point>>> {
    validate(subject, "subject")?;
    validate(clip, "clip")?;

    let pieces = to_geo(subject).intersection(&to_geo(clip));

    Ok(pieces
        .0
        .into_iter()
        .filter_map(|piece| {
            let (exterior, interiors) = piece.into_inner();
            if !interiors.is_empty() {
                debug!("clip produced {} interior ring(s); keeping exterior only", interiors.len());
            }
            let mut ring: Vec<Point> = exterior
                .into_inner()
                .into_iter()
                .map(|c| Point::new(c.x, c.y))
                .collect();
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            (ring.len() >= 3).then_some(ring)
        })
        .collect())
}

/// Clip `polygon` by `other` and build one output value per resulting piece
///
/// Each piece is re-oriented to the winding of `polygon` and gets its
/// centroid as center before `make` turns it into the output type. A failed
/// clip is logged with both inputs and yields an empty list.
pub fn clip_against<T, F>(polygon: &Polygon, other: &Polygon, mut make: F) -> Vec<T>
where
    F: FnMut(Polygon) -> T,
{
    let rings = match intersect(polygon, other) {
        Ok(rings) => rings,
        Err(err) => {
            warn!(
                "clip failed ({}): subject={:?} clip={:?}",
                err, polygon.vertices, other.vertices
            );
            return Vec::new();
        }
    };

    let subject_ccw = polygon.is_ccw();
    rings
        .into_iter()
        .map(|ring| {
            let mut piece = Polygon::from_vertices(ring);
            if piece.is_ccw() != subject_ccw {
                piece.vertices.reverse();
            }
            make(piece)
        })
        .collect()
}

fn validate(polygon: &Polygon, role: &str) -> Result<()> {
    if polygon.len() < 3 {
        return Err(WorldGenError::DegenerateGeometry(format!(
            "{} polygon has {} vertices",
            role,
            polygon.len()
        )));
    }
    if polygon.vertices.iter().any(|v| !v.is_finite()) {
        return Err(WorldGenError::DegenerateGeometry(format!(
            "{} polygon has non-finite coordinates",
            role
        )));
    }
    Ok(())
}

fn to_geo(polygon: &Polygon) -> GeoPolygon<f64> {
    let ring: Vec<Coord<f64>> = polygon
        .vertices
        .iter()
        .map(|v| Coord { x: v.x, y: v.y })
        .collect();
    GeoPolygon::new(LineString::from(ring), vec![])
}
