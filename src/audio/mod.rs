//! Audio input, analysis and feature extraction.
//!
//! Sources (live device or decoded file) push mono samples into a
//! [`SampleTap`]; once per frame the [`AudioEngine`] drains the tap into an
//! [`AnalysisNode`] and the [`FeatureExtractor`] turns the resulting
//! byte spectrum into normalised bass/mid/treble/energy.

mod analysis;
mod decode;
mod device;
mod engine;
mod features;
mod tap;

pub use analysis::{AnalysisFrame, AnalysisNode};
pub use decode::{write_mono_wav, AudioClip};
pub use device::{FilePlayback, LiveInput};
pub use engine::AudioEngine;
pub use features::{AnalyzerState, FeatureExtractor, FeatureVector};
pub use tap::SampleTap;
