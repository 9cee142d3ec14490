//! Perceptual band features with adaptive gain.
//!
//! Per frame: mean byte magnitude per band, weighted raw energy, a slowly
//! decaying ceiling that snaps up to loud frames, then sensitivity and a
//! squaring expander so quiet material stays calm and peaks punch through.

use std::ops::Range;

use tracing::debug;

use super::AnalysisFrame;
use crate::params::{FFTConfig, GainConfig};

/// Normalised audio features consumed by sketches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub energy: f32,
    pub level: f32,
    pub spectrum: Vec<u8>,
    pub waveform: Vec<u8>,
}

impl FeatureVector {
    /// All-zero features with empty spectrum/waveform
    pub fn silent() -> Self {
        Self::default()
    }
}

/// Session-long adaptive gain state
#[derive(Debug, Clone)]
pub struct AnalyzerState {
    /// Adaptive ceiling (byte scale)
    pub running_max: f32,
    /// Ceiling decrement per frame
    pub decay: f32,
    /// Lowest ceiling allowed
    pub floor: f32,
    sensitivity: f32,
}

impl AnalyzerState {
    pub fn new(gain: &GainConfig) -> Self {
        let mut state = Self {
            running_max: gain.initial_ceiling.max(gain.floor),
            decay: gain.decay_per_frame,
            floor: gain.floor,
            sensitivity: 1.0,
        };
        state.set_sensitivity(gain.sensitivity);
        state
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Non-finite values fall back to 1.0; the rest clamp to [0, 100]
    pub fn set_sensitivity(&mut self, value: f32) {
        self.sensitivity = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            1.0
        };
    }

    /// Decay towards the floor, then snap up to any louder band
    fn track(&mut self, loudest: f32) {
        self.running_max = (self.running_max - self.decay).max(self.floor);
        if loudest > self.running_max {
            self.running_max = loudest;
        }
    }
}

/// Bin ranges for one (sample rate, fft size) pair
#[derive(Debug, Clone, PartialEq)]
struct BandLayout {
    sample_rate: u32,
    fft_size: usize,
    bass: Range<usize>,
    mid: Range<usize>,
    treble: Range<usize>,
}

impl BandLayout {
    fn compute(bands: &FFTConfig, sample_rate: u32, fft_size: usize) -> Self {
        let config = FFTConfig {
            sample_rate_hz: sample_rate,
            fft_size,
            ..bands.clone()
        };
        debug!(
            "Band layout for {}Hz/{}: bass={:?} mid={:?} treble={:?}",
            sample_rate,
            fft_size,
            config.bass_bins(),
            config.mid_bins(),
            config.treble_bins()
        );
        Self {
            sample_rate,
            fft_size,
            bass: config.bass_bins(),
            mid: config.mid_bins(),
            treble: config.treble_bins(),
        }
    }
}

/// Turns analysis frames into [`FeatureVector`]s
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    bands: FFTConfig,
    weights: [f32; 3],
    state: AnalyzerState,
    layout: Option<BandLayout>,
}

impl FeatureExtractor {
    /// Band Hz ranges come from `bands`; its rate and size are ignored in
    /// favour of whatever each frame reports
    pub fn new(bands: FFTConfig, gain: GainConfig) -> Self {
        Self {
            bands,
            weights: gain.energy_weights,
            state: AnalyzerState::new(&gain),
            layout: None,
        }
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.state.set_sensitivity(value);
    }

    /// Extract features; `None` (no initialised source) yields silence
    pub fn extract(&mut self, frame: Option<&AnalysisFrame>) -> FeatureVector {
        let Some(frame) = frame else {
            return FeatureVector::silent();
        };
        if frame.sample_rate == 0 || frame.spectrum.is_empty() {
            return FeatureVector::silent();
        }

        let stale = self
            .layout
            .as_ref()
            .map_or(true, |l| l.sample_rate != frame.sample_rate || l.fft_size != frame.fft_size);
        if stale {
            self.layout = Some(BandLayout::compute(&self.bands, frame.sample_rate, frame.fft_size));
        }
        let Some(layout) = self.layout.as_ref() else {
            return FeatureVector::silent();
        };

        let spectrum = &frame.spectrum;
        let bass = band_mean(spectrum, &layout.bass);
        let mid = band_mean(spectrum, &layout.mid);
        let treble = band_mean(spectrum, &layout.treble);
        let [wb, wm, wt] = self.weights;
        let energy = wb * bass + wm * mid + wt * treble;

        self.state.track(bass.max(mid).max(treble).max(energy));

        let ceiling = self.state.running_max;
        let sensitivity = self.state.sensitivity;
        let shape = |raw: f32| {
            let v = (raw / ceiling * sensitivity).clamp(0.0, 1.0);
            v * v
        };

        let energy = shape(energy);
        FeatureVector {
            bass: shape(bass),
            mid: shape(mid),
            treble: shape(treble),
            energy,
            level: energy,
            spectrum: frame.spectrum.clone(),
            waveform: frame.waveform.clone(),
        }
    }
}

/// Mean magnitude over `range`, clamped to the spectrum; empty is 0
fn band_mean(spectrum: &[u8], range: &Range<usize>) -> f32 {
    let end = range.end.min(spectrum.len());
    let start = range.start.min(end);
    let bins = &spectrum[start..end];
    if bins.is_empty() {
        return 0.0;
    }
    bins.iter().map(|&b| b as f32).sum::<f32>() / bins.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(bass: u8, mid: u8, treble: u8) -> AnalysisFrame {
        let mut spectrum = vec![0u8; 2048];
        spectrum[2..14].fill(bass);
        spectrum[14..233].fill(mid);
        spectrum[233..1394].fill(treble);
        AnalysisFrame {
            spectrum,
            waveform: vec![128; 2048],
            sample_rate: 44100,
            fft_size: 4096,
        }
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(FFTConfig::default(), GainConfig::default())
    }

    #[test]
    fn test_uninitialised_source_is_silent() {
        let mut ex = extractor();
        let features = ex.extract(None);

        assert_eq!(features, FeatureVector::silent());
        assert!(features.spectrum.is_empty());
        // Gain state untouched
        assert_eq!(ex.state().running_max, 100.0);
    }

    #[test]
    fn test_band_scenario() {
        let mut ex = extractor();
        let f = ex.extract(Some(&frame_with(200, 50, 10)));

        // Ceiling snaps to the loudest band (200)
        assert_eq!(ex.state().running_max, 200.0);
        assert!((f.bass - 1.0).abs() < 1e-6);
        assert!((f.mid - 0.0625).abs() < 1e-6);
        assert!((f.treble - 0.0025).abs() < 1e-6);
        // raw energy = 0.6*200 + 0.3*50 + 0.1*10 = 136
        assert!((f.energy - 0.68 * 0.68).abs() < 1e-5, "energy {}", f.energy);
        assert_eq!(f.level, f.energy);
    }

    #[test]
    fn test_ceiling_decays_to_floor() {
        let mut ex = extractor();
        for _ in 0..1000 {
            ex.extract(Some(&frame_with(0, 0, 0)));
        }
        assert_eq!(ex.state().running_max, 16.0);

        // Quiet signal now reads loud against the low ceiling
        let f = ex.extract(Some(&frame_with(16, 16, 16)));
        assert!((f.bass - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sensitivity_sanitised() {
        let mut ex = extractor();

        ex.set_sensitivity(f32::NAN);
        assert_eq!(ex.state().sensitivity(), 1.0);
        ex.set_sensitivity(f32::INFINITY);
        assert_eq!(ex.state().sensitivity(), 1.0);
        ex.set_sensitivity(-3.0);
        assert_eq!(ex.state().sensitivity(), 0.0);
        ex.set_sensitivity(500.0);
        assert_eq!(ex.state().sensitivity(), 100.0);
    }

    #[test]
    fn test_zero_sensitivity_mutes() {
        let mut ex = extractor();
        ex.set_sensitivity(0.0);
        let f = ex.extract(Some(&frame_with(255, 255, 255)));

        assert_eq!((f.bass, f.mid, f.treble, f.energy), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_short_spectrum_clamps_ranges() {
        let mut ex = extractor();
        let frame = AnalysisFrame {
            spectrum: vec![100; 20],
            waveform: Vec::new(),
            sample_rate: 44100,
            fft_size: 4096,
        };
        let f = ex.extract(Some(&frame));

        assert!(f.bass > 0.0 && f.mid > 0.0);
        assert_eq!(f.treble, 0.0);
    }

    #[test]
    fn test_layout_follows_sample_rate() {
        let mut ex = extractor();
        ex.extract(Some(&frame_with(10, 10, 10)));
        let at_44k = ex.layout.clone().unwrap();

        let mut frame = frame_with(10, 10, 10);
        frame.sample_rate = 48000;
        ex.extract(Some(&frame));
        let at_48k = ex.layout.clone().unwrap();

        assert_eq!(at_44k.mid, 14..233);
        assert_ne!(at_44k.mid, at_48k.mid);
    }
}
