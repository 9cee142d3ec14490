//! Computational geometry for the partition engine.
//!
//! Everything here works on `glam::DVec2` points in canvas pixels; polygons
//! are plain vertex slices with an implicit closing edge.

mod grid;
mod mbr;
mod polygon;
mod split;

pub use grid::{SpatialGrid, DEFAULT_GRID_CELLS};
pub use mbr::Mbr;
pub use polygon::{
    find_split_chord_interior_point, is_diagonal, line_intersection, orient, point_in_polygon,
    polygon_area, segments_intersect, signed_area, vertex_centroid,
};
pub use split::curve_polygon_split;
