//! Byte-scaled spectrum and waveform analysis of a mono sample stream.
//!
//! Mirrors a browser analyser node: a rolling window of the most recent
//! `fft_size` samples is Hann-windowed and transformed, magnitudes are
//! smoothed over time and mapped from a dB range onto 0..=255.

use std::collections::VecDeque;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use tracing::{debug, trace};

use crate::error::AudioError;
use crate::params::FFTConfig;

/// One analysis snapshot handed to the feature extractor
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFrame {
    /// Smoothed magnitude per bin, `fft_size / 2` entries
    pub spectrum: Vec<u8>,
    /// Most recent `fft_size / 2` samples, 128 = silence
    pub waveform: Vec<u8>,
    pub sample_rate: u32,
    pub fft_size: usize,
}

/// Rolling FFT analyser
pub struct AnalysisNode {
    config: FFTConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: VecDeque<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    frames: u64,
}

impl AnalysisNode {
    pub fn new(config: FFTConfig) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::Config)?;

        let fft_size = config.fft_size;
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let window = (0..fft_size)
            .map(|i| {
                let t = i as f32 / (fft_size - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos())
            })
            .collect();

        debug!(
            "AnalysisNode created: sample_rate={}, fft_size={}, smoothing={}",
            config.sample_rate_hz, fft_size, config.smoothing
        );

        Ok(Self {
            fft,
            window,
            samples: VecDeque::with_capacity(fft_size),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            smoothed: vec![0.0; config.bin_count()],
            frames: 0,
            config,
        })
    }

    pub fn config(&self) -> &FFTConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate_hz
    }

    /// Append mono samples; only the newest `fft_size` are kept
    pub fn push_samples(&mut self, samples: &[f32]) {
        let fft_size = self.config.fft_size;
        let skip = samples.len().saturating_sub(fft_size);

        // NaN/Inf would poison the smoothed spectrum permanently
        self.samples.extend(
            samples[skip..]
                .iter()
                .map(|&s| if s.is_finite() { s } else { 0.0 }),
        );

        let excess = self.samples.len().saturating_sub(fft_size);
        self.samples.drain(..excess);
    }

    /// Forget buffered input; the spectrum then decays through smoothing
    pub fn clear_input(&mut self) {
        self.samples.clear();
    }

    /// Transform the current window and produce byte-scaled output
    pub fn analyse(&mut self) -> AnalysisFrame {
        let fft_size = self.config.fft_size;
        let pad = fft_size - self.samples.len();

        // Short history is zero-padded at the front (oldest side)
        for i in 0..fft_size {
            let sample = if i < pad { 0.0 } else { self.samples[i - pad] };
            self.buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let tau = self.config.smoothing;
        let norm = 1.0 / fft_size as f32;
        let db_span = self.config.max_db - self.config.min_db;

        let spectrum = self
            .smoothed
            .iter_mut()
            .zip(&self.buffer)
            .map(|(smoothed, bin)| {
                *smoothed = tau * *smoothed + (1.0 - tau) * bin.norm() * norm;
                let db = 20.0 * smoothed.log10();
                let scaled = 255.0 * (db - self.config.min_db) / db_span;
                // -inf (silence) and NaN both land on 0
                if scaled > 0.0 {
                    scaled.min(255.0) as u8
                } else {
                    0
                }
            })
            .collect();

        let half = fft_size / 2;
        let waveform_pad = half.saturating_sub(self.samples.len());
        let recent = self.samples.iter().skip(self.samples.len().saturating_sub(half));
        let waveform = std::iter::repeat(128u8)
            .take(waveform_pad)
            .chain(recent.map(|&s| (128.0 * (1.0 + s)).clamp(0.0, 255.0) as u8))
            .collect();

        self.frames += 1;
        if self.frames % 600 == 0 {
            trace!("AnalysisNode: {} frames analysed", self.frames);
        }

        AnalysisFrame {
            spectrum,
            waveform,
            sample_rate: self.config.sample_rate_hz,
            fft_size,
        }
    }
}
