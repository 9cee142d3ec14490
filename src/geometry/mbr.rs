//! Axis-aligned minimum bounding rectangle.

use glam::DVec2;

/// Minimum bounding rectangle accumulated from points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mbr {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for Mbr {
    /// Empty box: contains nothing, absorbs the first point added
    fn default() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }
}

impl Mbr {
    /// Box of a rectangle given by corner and size
    pub fn from_rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            max: DVec2::new(x + w, y + h),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec2>) -> Self {
        let mut mbr = Self::default();
        for p in points {
            mbr.add(*p);
        }
        mbr
    }

    pub fn add(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow by `margin` on every side
    pub fn expand(&mut self, margin: f64) {
        self.min -= DVec2::splat(margin);
        self.max += DVec2::splat(margin);
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn contained_in(&self, other: &Mbr) -> bool {
        other.min.x <= self.min.x
            && other.max.x >= self.max.x
            && other.min.y <= self.min.y
            && other.max.y >= self.max.y
    }

    /// Half-open containment: `[min, max)` on both axes
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.y >= self.min.y && p.x < self.max.x && p.y < self.max.y
    }

    /// Closed overlap test (touching boxes intersect)
    pub fn intersects(&self, other: &Mbr) -> bool {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        min.x <= max.x && min.y <= max.y
    }
}
