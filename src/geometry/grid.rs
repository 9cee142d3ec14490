//! Uniform grid index over a bounding region.
//!
//! Items are registered under every cell their box overlaps; queries visit
//! only the cells under the query box and report each item once.

use std::collections::HashSet;
use std::hash::Hash;

use super::Mbr;

/// Default cells per axis
pub const DEFAULT_GRID_CELLS: usize = 30;

/// Spatial hash grid keyed by bounding boxes
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    region: Mbr,
    nx: usize,
    ny: usize,
    cell_w: f64,
    cell_h: f64,
    cells: Vec<Vec<(Mbr, T)>>,
}

impl<T: Copy + Eq + Hash> SpatialGrid<T> {
    /// Create grid over `region` with `nx * ny` cells
    pub fn new(region: Mbr, nx: usize, ny: usize) -> Self {
        let nx = nx.max(1);
        let ny = ny.max(1);
        let size = region.size();

        // Degenerate regions collapse to a single column/row
        let cell_w = if size.x > 0.0 { size.x / nx as f64 } else { 1.0 };
        let cell_h = if size.y > 0.0 { size.y / ny as f64 } else { 1.0 };

        Self {
            region,
            nx,
            ny,
            cell_w,
            cell_h,
            cells: vec![Vec::new(); nx * ny],
        }
    }

    /// Register `item` in every cell overlapped by `mbr`
    pub fn insert(&mut self, mbr: Mbr, item: T) {
        for cell in self.cell_indices(&mbr) {
            self.cells[cell].push((mbr, item));
        }
    }

    /// Items whose box intersects `mbr`, deduplicated, in cell visit order
    pub fn query(&self, mbr: &Mbr) -> Vec<T> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for cell in self.cell_indices(mbr) {
            for (entry_mbr, item) in &self.cells[cell] {
                if entry_mbr.intersects(mbr) && seen.insert(*item) {
                    found.push(*item);
                }
            }
        }

        found
    }

    fn cell_indices(&self, mbr: &Mbr) -> Vec<usize> {
        if mbr.is_empty() || !mbr.intersects(&self.region) {
            return Vec::new();
        }

        let (ix0, ix1) = axis_span(
            (mbr.min.x, mbr.max.x),
            self.region.min.x,
            self.cell_w,
            self.nx,
        );
        let (iy0, iy1) = axis_span(
            (mbr.min.y, mbr.max.y),
            self.region.min.y,
            self.cell_h,
            self.ny,
        );

        let mut indices = Vec::with_capacity((ix1 - ix0 + 1) * (iy1 - iy0 + 1));
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                indices.push(ix + iy * self.nx);
            }
        }
        indices
    }
}

/// First and last cell index covered by `[lo, hi]` on one axis
fn axis_span((lo, hi): (f64, f64), origin: f64, cell: f64, count: usize) -> (usize, usize) {
    let index = |v: f64| ((v - origin) / cell).floor().clamp(0.0, (count - 1) as f64) as usize;
    (index(lo), index(hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> Mbr {
        Mbr::from_rect(x, y, w, h)
    }

    #[test]
    fn test_query_finds_overlapping_items() {
        let mut grid = SpatialGrid::new(boxed(0.0, 0.0, 100.0, 100.0), 10, 10);
        grid.insert(boxed(5.0, 5.0, 2.0, 2.0), 1);
        grid.insert(boxed(50.0, 50.0, 30.0, 30.0), 2);
        grid.insert(boxed(90.0, 0.0, 5.0, 5.0), 3);

        let mut hits = grid.query(&boxed(60.0, 60.0, 1.0, 1.0));
        hits.sort();
        assert_eq!(hits, vec![2]);

        let mut hits = grid.query(&boxed(0.0, 0.0, 100.0, 100.0));
        hits.sort();
        assert_eq!(hits, vec![1, 2, 3]);
    }

    #[test]
    fn test_spanning_item_reported_once() {
        let mut grid = SpatialGrid::new(boxed(0.0, 0.0, 30.0, 30.0), 30, 30);
        grid.insert(boxed(0.0, 0.0, 30.0, 30.0), 7);

        assert_eq!(grid.query(&boxed(0.0, 0.0, 30.0, 30.0)), vec![7]);
    }

    #[test]
    fn test_out_of_region_queries_are_clamped() {
        let mut grid = SpatialGrid::new(boxed(0.0, 0.0, 10.0, 10.0), 4, 4);
        grid.insert(boxed(9.0, 9.0, 1.0, 1.0), 'a');

        assert_eq!(grid.query(&boxed(9.5, 9.5, 50.0, 50.0)), vec!['a']);
        assert!(grid.query(&boxed(20.0, 20.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_zero_thickness_boxes() {
        // Horizontal edge: zero height box
        let mut grid = SpatialGrid::new(boxed(-1.0, -1.0, 3.0, 3.0), 30, 30);
        let edge = Mbr::from_points(&[DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)]);
        grid.insert(edge, 0usize);

        let segment = Mbr::from_points(&[DVec2::new(0.5, -0.1), DVec2::new(0.5, 1.1)]);
        assert_eq!(grid.query(&segment), vec![0]);
    }
}
