//! Polygon predicates and measurements.
//!
//! Polygons are slices of vertices with an implicit closing edge. All tests
//! are sign-based (orientation of point triples) rather than relying on
//! divisions, so they behave the same for either winding order.

use glam::DVec2;

/// Orientation of `c` relative to the directed line `a -> b`
///
/// Returns 1 (left/counter-clockwise), -1 (right/clockwise) or 0 (collinear)
pub fn orient(a: DVec2, b: DVec2, c: DVec2) -> i32 {
    let cross = b.x * (c.y - a.y) + c.x * (a.y - b.y) + a.x * (b.y - c.y);
    sign(cross)
}

fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Proper crossing test between segments `ab` and `cd`
///
/// Collinear overlaps are not reported
pub fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    (orient(a, b, c) - orient(a, b, d)).abs() >= 1 && (orient(c, d, a) - orient(c, d, b)).abs() >= 1
}

/// Intersection point of the infinite lines through `ab` and `cd`
///
/// Parallel lines yield `a` unchanged; only call this after
/// [`segments_intersect`] has succeeded.
pub fn line_intersection(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> DVec2 {
    let v1 = b - a;
    let v2 = d - c;
    let det = v1.x * v2.y - v1.y * v2.x;
    if det == 0.0 {
        return a;
    }
    let t = (v2.y * (c.x - a.x) - v2.x * (c.y - a.y)) / det;
    a + v1 * t
}

/// Ray-casting containment test for simple polygons
///
/// The ray runs from `p` to a reference point beyond the polygon's right
/// edge. An edge counts as crossed when it straddles the ray's height and
/// `p` and the reference point lie on opposite sides of it. Vertices exactly
/// on the ray are classified as below it, so a ray grazing a vertex or
/// running along a horizontal edge is counted consistently.
pub fn point_in_polygon(p: DVec2, poly: &[DVec2]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }

    let far_x = poly.iter().fold(p.x, |acc, q| acc.max(q.x)) + 1.0;
    let far = DVec2::new(far_x, p.y);
    let above = |q: DVec2| q.y > p.y;

    let mut prev = poly[n - 1];
    let mut crossings = 0;

    for &q in poly {
        if above(prev) != above(q) && orient(prev, q, p) != orient(prev, q, far) {
            crossings += 1;
        }
        prev = q;
    }

    crossings % 2 == 1
}

/// Unsigned shoelace area; fewer than 3 points is zero
pub fn polygon_area(poly: &[DVec2]) -> f64 {
    signed_area(poly).abs()
}

/// Shoelace area, positive for counter-clockwise (y-up) winding
pub fn signed_area(poly: &[DVec2]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut prev = poly[poly.len() - 1];
    let mut twice = 0.0;
    for &q in poly {
        twice += prev.x * q.y - q.x * prev.y;
        prev = q;
    }
    twice / 2.0
}

/// Average of the vertices (not the area centroid)
pub fn vertex_centroid(poly: &[DVec2]) -> DVec2 {
    if poly.is_empty() {
        return DVec2::ZERO;
    }
    poly.iter().copied().sum::<DVec2>() / poly.len() as f64
}

/// Whether the chord `i -> j` is an internal diagonal of `poly`
pub fn is_diagonal(i: usize, j: usize, poly: &[DVec2]) -> bool {
    let n = poly.len();
    if i == j || j == (i + 1) % n || i == (j + 1) % n {
        return false;
    }

    let (a, b) = (poly[i], poly[j]);
    for k in 0..n {
        let k_next = (k + 1) % n;
        if k == i || k == j || k_next == i || k_next == j {
            continue;
        }
        if segments_intersect(a, b, poly[k], poly[k_next]) {
            return false;
        }
    }

    point_in_polygon((a + b) / 2.0, poly)
}

/// Point inside `poly` suitable for seeding a balanced split
///
/// Picks the midpoint of the internal diagonal whose two sides have the
/// closest areas; falls back to the vertex centroid when the polygon has
/// fewer than 4 vertices or no chord qualifies.
pub fn find_split_chord_interior_point(poly: &[DVec2]) -> DVec2 {
    let n = poly.len();
    if n < 4 {
        return vertex_centroid(poly);
    }

    let mut best: Option<(f64, DVec2)> = None;

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if !is_diagonal(i, j, poly) {
                continue;
            }

            let side_a = polygon_area(&poly[i..=j]);
            let side_b: Vec<DVec2> = poly[j..].iter().chain(&poly[..=i]).copied().collect();
            let diff = (side_a - polygon_area(&side_b)).abs();

            if best.map_or(true, |(best_diff, _)| diff < best_diff) {
                best = Some((diff, (poly[i] + poly[j]) / 2.0));
            }
        }
    }

    best.map_or_else(|| vertex_centroid(poly), |(_, midpoint)| midpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    fn unit_square() -> Vec<DVec2> {
        vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]
    }

    /// Concave "L" shape
    fn ell() -> Vec<DVec2> {
        vec![
            v(0.0, 0.0),
            v(4.0, 0.0),
            v(4.0, 1.0),
            v(1.0, 1.0),
            v(1.0, 4.0),
            v(0.0, 4.0),
        ]
    }

    #[test]
    fn test_orient() {
        assert_eq!(orient(v(0.0, 0.0), v(1.0, 0.0), v(0.5, 1.0)), 1);
        assert_eq!(orient(v(0.0, 0.0), v(1.0, 0.0), v(0.5, -1.0)), -1);
        assert_eq!(orient(v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)), 0);
    }

    #[test]
    fn test_area() {
        assert!((polygon_area(&unit_square()) - 1.0).abs() < 1e-12);
        assert!((polygon_area(&ell()) - 7.0).abs() < 1e-12);

        let mut reversed = ell();
        reversed.reverse();
        assert!((polygon_area(&reversed) - 7.0).abs() < 1e-12);
        assert!(signed_area(&reversed) < 0.0);
    }

    #[test]
    fn test_degenerate_area() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[v(0.0, 0.0), v(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_segments_intersect() {
        assert!(segments_intersect(v(0.0, 0.0), v(2.0, 2.0), v(0.0, 2.0), v(2.0, 0.0)));
        assert!(!segments_intersect(v(0.0, 0.0), v(1.0, 1.0), v(2.0, 0.0), v(3.0, 1.0)));
        // Parallel
        assert!(!segments_intersect(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), v(1.0, 1.0)));
    }

    #[test]
    fn test_line_intersection() {
        let p = line_intersection(v(0.0, 0.0), v(2.0, 2.0), v(0.0, 2.0), v(2.0, 0.0));
        assert!((p - v(1.0, 1.0)).length() < 1e-12);

        let p = line_intersection(v(0.5, -0.1), v(0.5, 1.1), v(0.0, 0.0), v(1.0, 0.0));
        assert!((p - v(0.5, 0.0)).length() < 1e-12);

        // Parallel: start point returned
        let p = line_intersection(v(3.0, 0.0), v(4.0, 0.0), v(0.0, 1.0), v(1.0, 1.0));
        assert_eq!(p, v(3.0, 0.0));
    }

    #[test]
    fn test_point_in_polygon_both_windings() {
        let mut shape = ell();
        for _ in 0..2 {
            assert!(point_in_polygon(v(0.5, 0.5), &shape));
            assert!(point_in_polygon(v(3.5, 0.5), &shape));
            assert!(point_in_polygon(v(0.5, 3.5), &shape));
            assert!(!point_in_polygon(v(2.0, 2.0), &shape));
            assert!(!point_in_polygon(v(-1.0, 0.5), &shape));
            shape.reverse();
        }
    }

    #[test]
    fn test_ray_through_vertex() {
        // Ray from (0.5, 1.0) runs along the notch edge and through
        // vertex (1, 1) where the boundary turns upward
        let shape = ell();
        assert!(point_in_polygon(v(0.5, 1.0), &shape));

        // Diamond: ray through the right tip touches without crossing
        let diamond = vec![v(0.0, -1.0), v(1.0, 0.0), v(0.0, 1.0), v(-1.0, 0.0)];
        assert!(point_in_polygon(v(0.0, 0.0), &diamond));
        assert!(!point_in_polygon(v(-2.0, 0.0), &diamond));
    }

    #[test]
    fn test_diagonal_rejects_exterior_chord() {
        let shape = ell();
        // (4,1) -> (1,4) passes outside the notch
        assert!(!is_diagonal(2, 4, &shape));
        // (0,0) -> (1,1) is a real diagonal
        assert!(is_diagonal(0, 3, &shape));
        // Adjacent vertices never qualify
        assert!(!is_diagonal(0, 1, &shape));
    }

    #[test]
    fn test_split_point_of_square_is_center() {
        let p = find_split_chord_interior_point(&unit_square());
        assert!((p - v(0.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn test_split_point_is_inside_concave_polygon() {
        let shape = ell();
        let p = find_split_chord_interior_point(&shape);
        assert!(point_in_polygon(p, &shape), "seed {:?} outside", p);
    }

    #[test]
    fn test_triangle_falls_back_to_centroid() {
        let tri = vec![v(0.0, 0.0), v(3.0, 0.0), v(0.0, 3.0)];
        let p = find_split_chord_interior_point(&tri);
        assert!((p - v(1.0, 1.0)).length() < 1e-12);
    }
}
