//! Planar Voronoi tessellation inside a bounding box
//!
//! A site's Voronoi cell is the set of points closer to it than to any other
//! site, which is the intersection of the half-planes bounded by the
//! perpendicular bisectors to each Delaunay neighbour. The Delaunay
//! neighbours come from `spade`; each cell starts as the bounding box and is
//! cut by one bisector per neighbour.

use log::warn;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::HashMap;

use crate::geometry::{Point, Polygon};

/// One bounded Voronoi cell
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    /// Index of the generating site in the input slice
    pub site: usize,
    /// Cell outline (counter-clockwise, convex), centered on the site
    pub polygon: Polygon,
}

/// Compute the Voronoi cells of `sites` clipped to the box `[min, max]`
///
/// Cells come back in site order. A site that cannot be inserted
/// (non-finite, or a duplicate of an earlier site) gets no cell.
///
/// # Example
///
/// ```rust
/// use district_gen::generation::voronoi_cells;
/// use district_gen::Point;
///
/// let sites = [Point::new(25.0, 50.0), Point::new(75.0, 50.0)];
/// let cells = voronoi_cells(&sites, Point::ZERO, Point::splat(100.0));
///
/// assert_eq!(cells.len(), 2);
/// assert!((cells[0].polygon.area() - 5000.0).abs() < 1e-6);
/// ```
pub fn voronoi_cells(sites: &[Point], min: Point, max: Point) -> Vec<VoronoiCell> {
    let mut triangulation = DelaunayTriangulation::<Point2<f64>>::new();
    let mut handles = Vec::with_capacity(sites.len());
    let mut owners: HashMap<usize, usize> = HashMap::new();

    for (idx, site) in sites.iter().enumerate() {
        if !site.is_finite() {
            warn!("skipping non-finite Voronoi site {} at {:?}", idx, site);
            handles.push(None);
            continue;
        }
        match triangulation.insert(Point2::new(site.x, site.y)) {
            Ok(handle) => {
                if let Some(&owner) = owners.get(&handle.index()) {
                    warn!("Voronoi site {} duplicates site {}; skipping", idx, owner);
                    handles.push(None);
                } else {
                    owners.insert(handle.index(), idx);
                    handles.push(Some(handle));
                }
            }
            Err(err) => {
                warn!("could not insert Voronoi site {} at {:?}: {:?}", idx, site, err);
                handles.push(None);
            }
        }
    }

    let bounds = Polygon::rect(min, max).vertices;

    handles
        .iter()
        .enumerate()
        .filter_map(|(idx, handle)| {
            let handle = (*handle)?;
            let site = sites[idx];

            let mut ring = bounds.clone();
            for edge in triangulation.vertex(handle).out_edges() {
                let neighbor = edge.to().position();
                ring = clip_to_bisector(&ring, site, Point::new(neighbor.x, neighbor.y));
                if ring.len() < 3 {
                    return None;
                }
            }

            Some(VoronoiCell {
                site: idx,
                polygon: Polygon::new(ring, site),
            })
        })
        .collect()
}

/// Keep the part of a convex ring that is closer to `site` than to `neighbor`
fn clip_to_bisector(ring: &[Point], site: Point, neighbor: Point) -> Vec<Point> {
    let normal = neighbor - site;
    let mid = (site + neighbor) * 0.5;
    let side = |p: Point| (p - mid).dot(normal);

    let n = ring.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let current = ring[i];
        let next = ring[(i + 1) % n];
        let dc = side(current);
        let dn = side(next);

        if dc <= 0.0 {
            out.push(current);
        }
        if (dc < 0.0 && dn > 0.0) || (dc > 0.0 && dn < 0.0) {
            let t = dc / (dc - dn);
            out.push(current + (next - current) * t);
        }
    }
    out
}
