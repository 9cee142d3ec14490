//! Noise-steered splitting curves.
//!
//! Two walkers leave the seed point in opposite directions. At every step
//! the heading is read from the noise field under the walker, so nearby
//! curves flow alike while mid-band energy stirs the field harder.

use glam::DVec2;
use rand::Rng;

use crate::geometry::Mbr;
use crate::noise::GradientNoise;

/// Shape parameters for one curve
#[derive(Debug, Clone, Copy)]
pub struct WalkParams {
    /// Pixels moved per step
    pub step_px: f64,
    /// Steps allowed per walker
    pub max_steps: usize,
    /// Noise-space distance per unit of walker travel
    pub noise_scale: f64,
    /// Heading multiplier: 1 + mid * turbulence
    pub turbulence: f64,
}

/// Build a curve through `seed`: reversed forward walk, seed, backward walk
///
/// Each walker stops after its first point outside `canvas` (closed bounds)
/// or after `max_steps` points.
pub fn generate_curve<R: Rng>(
    rng: &mut R,
    noise: &GradientNoise,
    seed: DVec2,
    canvas: &Mbr,
    params: &WalkParams,
) -> Vec<DVec2> {
    let noise_z = rng.gen_range(0.0..10_000.0);
    let base_angle = rng.gen_range(0.0..std::f64::consts::TAU);

    let forward = walk(noise, seed, base_angle, noise_z, canvas, params);
    let backward = walk(
        noise,
        seed,
        base_angle + std::f64::consts::PI,
        noise_z,
        canvas,
        params,
    );

    let mut curve = Vec::with_capacity(forward.len() + backward.len() + 1);
    curve.extend(forward.into_iter().rev());
    curve.push(seed);
    curve.extend(backward);
    curve
}

fn walk(
    noise: &GradientNoise,
    start: DVec2,
    heading: f64,
    noise_z: f64,
    canvas: &Mbr,
    params: &WalkParams,
) -> Vec<DVec2> {
    let mut points = Vec::with_capacity(params.max_steps);
    // Noise is sampled along a unit-speed shadow of the walker
    let mut probe = start;
    let mut pos = start;

    for _ in 0..params.max_steps {
        let field = noise.sample(
            probe.x * params.noise_scale,
            probe.y * params.noise_scale,
            noise_z,
        );
        let angle = field * std::f64::consts::TAU * params.turbulence + heading;
        let dir = DVec2::from_angle(angle);

        probe += dir;
        pos += dir * params.step_px;
        points.push(pos);

        if !inside_closed(canvas, pos) {
            break;
        }
    }

    points
}

fn inside_closed(canvas: &Mbr, p: DVec2) -> bool {
    p.x >= canvas.min.x && p.y >= canvas.min.y && p.x <= canvas.max.x && p.y <= canvas.max.y
}
