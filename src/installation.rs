//! Per-frame wiring of audio features into a sketch.

use crate::audio::{AnalysisFrame, FeatureExtractor, FeatureVector};
use crate::sketch::{Canvas, Sketch};

/// Owns the extractor and the active sketch; one `step` per frame
pub struct FrameLoop<S: Sketch> {
    extractor: FeatureExtractor,
    sketch: S,
    features: FeatureVector,
    frames: u64,
}

impl<S: Sketch> FrameLoop<S> {
    pub fn new(extractor: FeatureExtractor, sketch: S) -> Self {
        Self {
            extractor,
            sketch,
            features: FeatureVector::silent(),
            frames: 0,
        }
    }

    /// Set up the sketch for a canvas size (also used after resizes)
    pub fn setup(&mut self, width: f64, height: f64) {
        self.sketch.setup(width, height);
    }

    /// Extract features (silence without a source) and advance the sketch
    pub fn step(&mut self, analysis: Option<&AnalysisFrame>) -> &FeatureVector {
        self.features = self.extractor.extract(analysis);
        self.sketch.update(&self.features);
        self.frames += 1;
        &self.features
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        self.sketch.draw(canvas, &self.features);
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    pub fn sketch_mut(&mut self) -> &mut S {
        &mut self.sketch
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.extractor.set_sensitivity(value);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tear the sketch down; the loop is done after this
    pub fn finish(mut self) -> S {
        self.sketch.cleanup();
        self.sketch
    }
}
