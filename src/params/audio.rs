//! Audio analysis configuration and adaptive gain constants.

use std::ops::Range;

/// FFT analysis configuration with frequency band mappings
///
/// Band boundaries are stored in Hz and converted to bins on demand, so a
/// source running at a different sample rate gets correctly placed bands.
#[derive(Debug, Clone)]
pub struct FFTConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// FFT window size (must be power of 2)
    /// 4096 @ 44.1kHz = 2048 bins of ~10.77 Hz
    pub fft_size: usize,

    /// Temporal smoothing between successive spectra (0 = none, <1)
    pub smoothing: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_db: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_db: f32,

    /// Bass frequency range (Hz)
    /// bins 2..14 at the defaults
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    /// bins 14..233 at the defaults
    pub mid_range_hz: (f32, f32),

    /// Treble frequency range (Hz)
    /// bins 233..1394 at the defaults
    pub treble_range_hz: (f32, f32),
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 4096,
            smoothing: 0.85,
            min_db: -100.0,
            max_db: -30.0,
            bass_range_hz: (20.0, 150.0),
            mid_range_hz: (150.0, 2500.0),
            treble_range_hz: (2500.0, 15000.0),
        }
    }
}

impl FFTConfig {
    /// Same band layout, different source rate
    pub fn with_sample_rate(&self, sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            ..self.clone()
        }
    }

    /// Number of magnitude bins the analyser produces
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Width of one bin (Hz)
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Convert frequency (Hz) to the first FFT bin at or above it
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32).ceil() as usize
    }

    fn bins(&self, (lo, hi): (f32, f32)) -> Range<usize> {
        self.hz_to_bin(lo)..self.hz_to_bin(hi)
    }

    /// Get FFT bin range for bass frequencies
    pub fn bass_bins(&self) -> Range<usize> {
        self.bins(self.bass_range_hz)
    }

    /// Get FFT bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.bins(self.mid_range_hz)
    }

    /// Get FFT bin range for treble frequencies
    pub fn treble_bins(&self) -> Range<usize> {
        self.bins(self.treble_range_hz)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(format!(
                "FFT size must be a power of 2 >= 32, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(format!(
                "Smoothing must be in [0, 1), got {}",
                self.smoothing
            ));
        }
        if self.min_db >= self.max_db {
            return Err(format!(
                "min_db ({}) must be below max_db ({})",
                self.min_db, self.max_db
            ));
        }
        Ok(())
    }
}

/// Adaptive gain control parameters (magnitudes on the 0-255 byte scale)
#[derive(Debug, Clone)]
pub struct GainConfig {
    /// Ceiling at session start
    pub initial_ceiling: f32,

    /// Amount the ceiling falls every frame
    /// 0.25/frame = ~15 byte levels per second at 60fps
    pub decay_per_frame: f32,

    /// Lowest the ceiling may fall (keeps noise from being amplified)
    pub floor: f32,

    /// User sensitivity multiplier applied after normalization
    pub sensitivity: f32,

    /// Weights for raw energy: bass, mid, treble
    pub energy_weights: [f32; 3],
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            initial_ceiling: 100.0,
            decay_per_frame: 0.25,
            floor: 16.0,
            sensitivity: 1.0,
            energy_weights: [0.6, 0.3, 0.1],
        }
    }
}
