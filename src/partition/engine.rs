//! Recursive partition state machine.
//!
//! The canvas starts as one rectangle. While the music is energetic, each
//! frame spends one split attempt on the largest cell; once the attempt
//! budget is used up the composition holds until it stagnates or a heavy
//! bass hit wipes it and starts over.

use glam::{DVec2, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::curve::{generate_curve, WalkParams};
use super::polygon::{random_drift, Polygon};
use crate::audio::FeatureVector;
use crate::color::{random_palette_color, Hsb};
use crate::geometry::{
    curve_polygon_split, find_split_chord_interior_point, point_in_polygon, Mbr,
};
use crate::noise::GradientNoise;
use crate::params::{AudioReactiveMapping, PartitionConfig};

/// Jitter applied to the palette colour of a fresh canvas
const INITIAL_COLOR_JITTER: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionState {
    /// Fresh single-rectangle canvas
    Generating,
    /// Spending split attempts while energy allows
    Splitting,
    /// Attempt budget exhausted, waiting for a reset trigger
    Saturated { stagnant_frames: u32 },
}

/// Result of one split attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Parent replaced by two children
    Split,
    /// Curve missed (wrong crossing count, area mismatch, seed not found)
    Rejected,
    /// No cell with positive area to seed from
    NoSeed,
}

pub struct PartitionEngine {
    config: PartitionConfig,
    mapping: AudioReactiveMapping,
    canvas: Mbr,
    polygons: Vec<Polygon>,
    state: PartitionState,
    max_splits: u32,
    split_attempts: u32,
    resets: u64,
    rng: StdRng,
    noise: GradientNoise,
}

impl PartitionEngine {
    pub fn new(
        width: f64,
        height: f64,
        config: PartitionConfig,
        mapping: AudioReactiveMapping,
    ) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let mut engine = Self {
            canvas: Mbr::from_rect(0.0, 0.0, width, height),
            polygons: Vec::new(),
            state: PartitionState::Generating,
            max_splits: config.max_splits.max(1),
            split_attempts: 0,
            resets: 0,
            rng,
            noise: GradientNoise::default(),
            config,
            mapping,
        };
        engine.generate();
        engine
    }

    /// Replace everything with one canvas rectangle in a palette colour
    pub fn generate(&mut self) {
        let size = self.canvas.size();
        let corners = vec![
            DVec2::ZERO,
            DVec2::new(size.x, 0.0),
            DVec2::new(size.x, size.y),
            DVec2::new(0.0, size.y),
        ];
        let color = random_palette_color(&mut self.rng).jitter(&mut self.rng, INITIAL_COLOR_JITTER);
        let drift = random_drift(&mut self.rng);

        self.polygons = vec![Polygon::new(corners, color, drift)];
        self.split_attempts = 0;
        self.state = PartitionState::Generating;
        self.noise
            .set_seed_offset(DVec3::splat(self.rng.gen_range(0.0..1000.0)));
    }

    /// Start over on a canvas of a new size
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas = Mbr::from_rect(0.0, 0.0, width, height);
        self.generate();
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn state(&self) -> PartitionState {
        self.state
    }

    pub fn canvas(&self) -> &Mbr {
        &self.canvas
    }

    pub fn split_attempts(&self) -> u32 {
        self.split_attempts
    }

    pub fn max_splits(&self) -> u32 {
        self.max_splits
    }

    /// Change the attempt budget; takes effect on the next update
    pub fn set_max_splits(&mut self, max_splits: u32) {
        self.max_splits = max_splits.max(1);
    }

    /// Number of automatic resets since creation
    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Advance one frame; returns the split outcome if an attempt was made
    pub fn update(&mut self, features: &FeatureVector) -> Option<SplitOutcome> {
        match self.state {
            PartitionState::Generating => self.state = PartitionState::Splitting,
            // Budget raised since saturating
            PartitionState::Saturated { .. } if self.split_attempts < self.max_splits => {
                self.state = PartitionState::Splitting;
            }
            _ => {}
        }
        if self.state == PartitionState::Splitting && self.split_attempts >= self.max_splits {
            self.state = PartitionState::Saturated { stagnant_frames: 0 };
        }

        match self.state {
            PartitionState::Saturated { stagnant_frames } => {
                let stagnant_frames = stagnant_frames + 1;
                if stagnant_frames > self.config.stagnation_frames
                    || features.bass > self.mapping.bass_reset_threshold
                {
                    debug!(
                        stagnant_frames,
                        bass = features.bass,
                        cells = self.polygons.len(),
                        "Partition reset"
                    );
                    self.resets += 1;
                    self.generate();
                } else {
                    self.state = PartitionState::Saturated { stagnant_frames };
                }
                None
            }
            _ if features.energy > self.mapping.split_energy_threshold => {
                let outcome = self.split_once(features);
                if self.split_attempts >= self.max_splits {
                    self.state = PartitionState::Saturated { stagnant_frames: 0 };
                }
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Spend one attempt splitting the largest cell
    pub fn split_once(&mut self, features: &FeatureVector) -> SplitOutcome {
        self.split_attempts += 1;

        // Largest first; zero-area cells sink to the end
        self.polygons
            .sort_by(|a, b| b.area().total_cmp(&a.area()));
        let Some(largest) = self.polygons.first().filter(|p| p.area() > 0.0) else {
            return SplitOutcome::NoSeed;
        };

        let seed = find_split_chord_interior_point(largest.points());
        let params = WalkParams {
            step_px: self.config.walk_step_px,
            max_steps: self.config.walk_max_steps,
            noise_scale: self.config.walk_noise_scale,
            turbulence: 1.0 + features.mid as f64 * self.mapping.mid_turbulence,
        };
        let curve = generate_curve(&mut self.rng, &self.noise, seed, &self.canvas, &params);

        let Some(index) = self
            .polygons
            .iter()
            .position(|p| p.bounds().contains(seed) && point_in_polygon(seed, p.points()))
        else {
            trace!(?seed, "Split seed outside every cell");
            return SplitOutcome::Rejected;
        };

        let Some(parts) = curve_polygon_split(
            &curve,
            self.polygons[index].points(),
            self.config.grid_cells,
            self.config.grid_margin,
        ) else {
            return SplitOutcome::Rejected;
        };

        let parent = self.polygons.swap_remove(index);
        let jitter =
            self.mapping.color_jitter_base + features.treble * self.mapping.treble_to_jitter_scale;

        for part in parts {
            let color: Hsb = parent.color().jitter(&mut self.rng, jitter);
            let drift = random_drift(&mut self.rng);
            self.polygons.push(Polygon::new(part, color, drift));
        }

        trace!(
            attempt = self.split_attempts,
            cells = self.polygons.len(),
            curve_points = curve.len(),
            "Split"
        );
        SplitOutcome::Split
    }
}
