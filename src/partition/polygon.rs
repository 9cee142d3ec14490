//! Immutable partition cell.

use glam::DVec2;
use rand::Rng;

use crate::color::Hsb;
use crate::geometry::{polygon_area, Mbr};

/// One cell of the partition
///
/// Bounds and area are computed once at construction; a split replaces the
/// cell rather than editing it.
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<DVec2>,
    bounds: Mbr,
    color: Hsb,
    area: f64,
    drift: DVec2,
}

impl Polygon {
    pub fn new(points: Vec<DVec2>, color: Hsb, drift: DVec2) -> Self {
        let bounds = Mbr::from_points(&points);
        let area = polygon_area(&points);
        Self {
            points,
            bounds,
            color,
            area,
            drift,
        }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn bounds(&self) -> &Mbr {
        &self.bounds
    }

    pub fn color(&self) -> Hsb {
        self.color
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Direction and strength of the bass "explosion" displacement
    pub fn drift(&self) -> DVec2 {
        self.drift
    }
}

/// Random direction with magnitude in [0.5, 2)
pub fn random_drift<R: Rng>(rng: &mut R) -> DVec2 {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let magnitude = rng.gen_range(0.5..2.0);
    DVec2::from_angle(angle) * magnitude
}
