//! Sketch abstraction: parametrised, audio-driven generators.
//!
//! A sketch owns its state and parameters, advances once per frame from a
//! [`FeatureVector`], and draws through a [`Canvas`] it never owns.

mod binding;
mod partition;
mod presets;

use glam::DVec2;

pub use binding::{ParamDescriptor, ParamKind, ParamValue, SketchParams};
pub use partition::PartitionSketch;
pub use presets::{apply_preset, capture_preset, load_presets, save_presets, PresetFile};

use crate::audio::FeatureVector;
use crate::color::Hsb;

/// Drawing surface sketches render into
pub trait Canvas {
    /// Size in pixels
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Hsb);

    /// Fill with even-odd rule; `alpha` in [0, 1]
    fn fill_polygon(&mut self, points: &[DVec2], color: Hsb, alpha: f32);

    /// Closed outline of `width` pixels
    fn stroke_polygon(&mut self, points: &[DVec2], color: Hsb, alpha: f32, width: f32);
}

pub trait Sketch {
    /// Stable identifier used as the preset key
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn params(&self) -> &SketchParams;

    fn params_mut(&mut self) -> &mut SketchParams;

    /// (Re)initialise for a canvas of the given size
    fn setup(&mut self, width: f64, height: f64);

    /// Advance one frame
    fn update(&mut self, features: &FeatureVector);

    fn draw<C: Canvas>(&self, canvas: &mut C, features: &FeatureVector);

    /// Release anything held between setup and teardown
    fn cleanup(&mut self) {}
}
