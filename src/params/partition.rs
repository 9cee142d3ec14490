//! Partition engine parameters and audio-reactive mapping.

use crate::geometry::DEFAULT_GRID_CELLS;

/// Recursive partition parameters (lengths in canvas pixels)
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Split attempts before the composition saturates
    pub max_splits: u32,

    /// Saturated frames tolerated before an automatic reset
    /// 60 = ~1s at 60fps
    pub stagnation_frames: u32,

    /// Length of one random-walk step (pixels)
    pub walk_step_px: f64,

    /// Step cap for each half of the splitting curve
    pub walk_max_steps: usize,

    /// Noise-space distance covered per walk step
    pub walk_noise_scale: f64,

    /// Spatial grid resolution used by the curve/edge search
    pub grid_cells: (usize, usize),

    /// Margin added around the polygon+curve bounds before gridding (pixels)
    pub grid_margin: f64,

    /// Fixed RNG seed (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_splits: 150,
            stagnation_frames: 60,
            walk_step_px: 20.0,
            walk_max_steps: 100,
            walk_noise_scale: 0.1,
            grid_cells: (DEFAULT_GRID_CELLS, DEFAULT_GRID_CELLS),
            grid_margin: 20.0,
            seed: None,
        }
    }
}

/// Mapping from audio features to partition behaviour
#[derive(Debug, Clone)]
pub struct AudioReactiveMapping {
    /// Energy required before a frame may split
    pub split_energy_threshold: f32,

    /// Bass level that slams a saturated composition into a reset
    pub bass_reset_threshold: f32,

    /// Scale factor: mid energy → walk angle turbulence
    /// Formula: angle = noise * 2π * (1 + mid * this_scale)
    pub mid_turbulence: f64,

    /// Color jitter applied to every child polygon
    pub color_jitter_base: f32,

    /// Scale factor: treble energy → extra color jitter
    /// Formula: jitter = base + treble * this_scale
    pub treble_to_jitter_scale: f32,
}

impl Default for AudioReactiveMapping {
    fn default() -> Self {
        Self {
            split_energy_threshold: 0.25,
            bass_reset_threshold: 0.85,
            mid_turbulence: 1.0,
            color_jitter_base: 0.05,
            treble_to_jitter_scale: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_matches_geometry_default() {
        let config = PartitionConfig::default();
        assert_eq!(config.grid_cells, (DEFAULT_GRID_CELLS, DEFAULT_GRID_CELLS));
        assert_eq!(config.stagnation_frames, 60);
    }
}
