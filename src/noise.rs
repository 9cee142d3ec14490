//! Gradient noise used to steer splitting curves.
//!
//! Lattice gradients come from a sine-fract hash, corners are blended with
//! cubic easing, and octaves are summed with geometric falloff. The field is
//! a pure function of its inputs plus an explicit seed offset, so two
//! generators with different offsets decorrelate at the same coordinates.

use glam::DVec3;

const HASH_X: DVec3 = DVec3::new(127.1, 311.7, 74.7);
const HASH_Y: DVec3 = DVec3::new(269.5, 183.3, 246.1);
const HASH_Z: DVec3 = DVec3::new(113.5, 271.9, 124.6);
const HASH_SCALE: f64 = 43758.5453123;

/// Multi-octave 3D gradient noise generator
#[derive(Debug, Clone)]
pub struct GradientNoise {
    offset: DVec3,
    octaves: u32,
    falloff: f64,
}

impl Default for GradientNoise {
    fn default() -> Self {
        Self::new(4, 0.5)
    }
}

impl GradientNoise {
    /// Create noise generator with octave count and per-octave amplitude falloff
    pub fn new(octaves: u32, falloff: f64) -> Self {
        Self {
            offset: DVec3::ZERO,
            octaves: octaves.max(1),
            falloff,
        }
    }

    /// Shift the sampled field (decorrelates generators sharing coordinates)
    pub fn set_seed_offset(&mut self, offset: DVec3) {
        self.offset = offset;
    }

    /// Sample multi-octave noise at position
    ///
    /// Returns value in approximately [0, 1]; integer lattice points with a
    /// zero offset give exactly 0.5
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = DVec3::new(x, y, z);
        let mut sum = self.octave(p);
        let mut total = 1.0;
        let mut weight = self.falloff;
        let mut mult = 2.0;

        for _ in 1..self.octaves {
            sum += weight * self.octave(p * mult);
            total += weight;
            weight *= self.falloff;
            mult *= 2.0;
        }

        sum / total
    }

    /// Single octave, remapped from [-1.5, 1.5]-ish to [0, 1]
    fn octave(&self, p: DVec3) -> f64 {
        let p = p + self.offset;
        let i = p.floor();
        let f = p - i;
        let u = f * f * (DVec3::splat(3.0) - 2.0 * f);

        let corner = |dx: f64, dy: f64, dz: f64| {
            let d = DVec3::new(dx, dy, dz);
            lattice_gradient(i + d).dot(f - d)
        };

        let x00 = lerp(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), u.x);
        let x10 = lerp(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), u.x);
        let x01 = lerp(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), u.x);
        let x11 = lerp(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), u.x);

        let value = lerp(lerp(x00, x10, u.y), lerp(x01, x11, u.y), u.z);
        value / 1.5 + 0.5
    }
}

/// Pseudo-random gradient for an integer lattice point, components in [-1, 1)
fn lattice_gradient(p: DVec3) -> DVec3 {
    DVec3::new(
        -1.0 + 2.0 * fract(p.dot(HASH_X).sin() * HASH_SCALE),
        -1.0 + 2.0 * fract(p.dot(HASH_Y).sin() * HASH_SCALE),
        -1.0 + 2.0 * fract(p.dot(HASH_Z).sin() * HASH_SCALE),
    )
}

fn fract(x: f64) -> f64 {
    x - x.floor()
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
