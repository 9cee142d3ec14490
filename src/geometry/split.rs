//! Splitting a polygon along an open polyline.
//!
//! The polygon's edges are bucketed in a [`SpatialGrid`] so each curve
//! segment only tests the edges near it. A split is accepted only when the
//! curve crosses the boundary exactly twice and the two resulting loops
//! cover the parent's area.

use glam::DVec2;
use tracing::trace;

use super::{line_intersection, polygon_area, segments_intersect, Mbr, SpatialGrid};

/// Relative area mismatch tolerated between parent and children
const AREA_TOLERANCE: f64 = 1e-6;

/// One place where the curve meets the polygon boundary
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Curve segment index (segment `k` runs from `curve[k]` to `curve[k + 1]`)
    segment: usize,
    /// Position along the curve segment, 0..1
    t: f64,
    /// Polygon edge index (edge `i` runs from `poly[i]` to `poly[i + 1]`)
    edge: usize,
    /// Position along the polygon edge, 0..1
    s: f64,
    point: DVec2,
}

/// Split `poly` into two loops along `curve`
///
/// Returns `None` when the curve does not cross the boundary exactly twice,
/// when the cut between the crossings intersects itself, or when the
/// children fail the area check (degenerate slivers). `cells` is the grid resolution per axis and
/// `margin` pads the gridded region.
pub fn curve_polygon_split(
    curve: &[DVec2],
    poly: &[DVec2],
    cells: (usize, usize),
    margin: f64,
) -> Option<[Vec<DVec2>; 2]> {
    let n = poly.len();
    if n < 3 || curve.len() < 2 {
        return None;
    }

    let mut region = Mbr::from_points(poly.iter().chain(curve));
    region.expand(margin);

    let mut grid = SpatialGrid::new(region, cells.0, cells.1);
    for i in 0..n {
        let (a, b) = (poly[i], poly[(i + 1) % n]);
        grid.insert(Mbr::from_points(&[a, b]), i);
    }

    let mut crossings = Vec::new();
    for k in 0..curve.len() - 1 {
        let (c0, c1) = (curve[k], curve[k + 1]);
        for i in grid.query(&Mbr::from_points(&[c0, c1])) {
            let (e0, e1) = (poly[i], poly[(i + 1) % n]);
            if !segments_intersect(c0, c1, e0, e1) {
                continue;
            }
            let point = line_intersection(c0, c1, e0, e1);
            crossings.push(Crossing {
                segment: k,
                t: param_along(c0, c1, point),
                edge: i,
                s: param_along(e0, e1, point),
                point,
            });
        }
    }

    if crossings.len() != 2 {
        trace!(crossings = crossings.len(), "Split rejected: need exactly two crossings");
        return None;
    }

    crossings.sort_by(|a, b| a.segment.cmp(&b.segment).then(a.t.total_cmp(&b.t)));
    let (first, second) = (crossings[0], crossings[1]);
    let inner = &curve[first.segment + 1..=second.segment];

    let mut cut = Vec::with_capacity(inner.len() + 2);
    cut.push(first.point);
    cut.extend_from_slice(inner);
    cut.push(second.point);
    if !is_simple_path(&cut) {
        trace!("Split rejected: curve loops back on itself");
        return None;
    }

    let mut left = Vec::with_capacity(inner.len() + n + 2);
    left.push(first.point);
    left.extend_from_slice(inner);
    left.push(second.point);
    left.extend(forward_vertices(poly, (second.edge, second.s), (first.edge, first.s)));

    let mut right = Vec::with_capacity(inner.len() + n + 2);
    right.push(second.point);
    right.extend(inner.iter().rev());
    right.push(first.point);
    right.extend(forward_vertices(poly, (first.edge, first.s), (second.edge, second.s)));

    let parent = polygon_area(poly);
    let (area_l, area_r) = (polygon_area(&left), polygon_area(&right));

    if left.len() < 3 || right.len() < 3 || area_l <= 0.0 || area_r <= 0.0 {
        trace!("Split rejected: degenerate child");
        return None;
    }
    if ((area_l + area_r) - parent).abs() > AREA_TOLERANCE * parent.max(1.0) {
        trace!(parent, area_l, area_r, "Split rejected: children do not cover parent");
        return None;
    }

    Some([left, right])
}

/// Whether no two non-adjacent segments of the open polyline cross
fn is_simple_path(path: &[DVec2]) -> bool {
    let segments = path.len().saturating_sub(1);
    for i in 0..segments {
        for j in (i + 2)..segments {
            if segments_intersect(path[i], path[i + 1], path[j], path[j + 1]) {
                return false;
            }
        }
    }
    true
}

/// Polygon vertices met walking forward from a point on edge `from` to a
/// point on edge `to`
fn forward_vertices(
    poly: &[DVec2],
    (from, from_s): (usize, f64),
    (to, to_s): (usize, f64),
) -> impl Iterator<Item = DVec2> + '_ {
    let n = poly.len();
    let count = if from == to && from_s < to_s {
        0
    } else {
        (to + n - from - 1) % n + 1
    };
    (1..=count).map(move |step| poly[(from + step) % n])
}

/// Parameter of `p` along `a -> b` (p assumed on the segment)
fn param_along(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    let d = b - a;
    let len_sq = d.length_squared();
    if len_sq == 0.0 {
        0.0
    } else {
        (p - a).dot(d) / len_sq
    }
}
