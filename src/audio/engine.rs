//! Audio source management and per-frame analysis.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{AnalysisFrame, AnalysisNode, AudioClip, FilePlayback, LiveInput, SampleTap};
use crate::error::AudioError;
use crate::params::FFTConfig;

/// Seconds of audio the tap buffers between drains
const TAP_SECONDS: usize = 2;

enum Source {
    Idle,
    Live(LiveInput),
    File(FilePlayback),
}

/// Owns at most one running source plus the analyser it feeds
///
/// Until a source has started, [`AudioEngine::analyse`] returns `None` and
/// the extractor produces silence.
pub struct AudioEngine {
    fft_config: FFTConfig,
    tap: SampleTap,
    node: Option<AnalysisNode>,
    source: Source,
}

impl AudioEngine {
    pub fn new(fft_config: FFTConfig) -> Result<Self, AudioError> {
        fft_config.validate().map_err(AudioError::Config)?;
        let capacity = fft_config.sample_rate_hz as usize * TAP_SECONDS;

        Ok(Self {
            fft_config,
            tap: SampleTap::new(capacity),
            node: None,
            source: Source::Idle,
        })
    }

    /// Whether an analyser exists (some source has started successfully)
    pub fn is_initialized(&self) -> bool {
        self.node.is_some()
    }

    pub fn is_live(&self) -> bool {
        matches!(self.source, Source::Live(_))
    }

    /// True while a file source exists and has not reached its end
    pub fn is_playing_file(&self) -> bool {
        match &self.source {
            Source::File(playback) => playback.is_playing(),
            _ => false,
        }
    }

    /// Turn live input on (replacing any file) or off
    ///
    /// Returns the new live state
    pub fn toggle_live_input(&mut self) -> Result<bool, AudioError> {
        if self.is_live() {
            self.teardown();
            info!("Live input off");
            return Ok(false);
        }

        self.teardown();
        let input = LiveInput::start(self.tap.clone())?;
        self.ensure_node(input.sample_rate())?;
        self.source = Source::Live(input);
        info!("Live input on");
        Ok(true)
    }

    /// Decode and play a WAV file, replacing the current source
    ///
    /// A file that fails to decode leaves the current source running
    pub fn play_file(&mut self, path: &Path) -> Result<(), AudioError> {
        let clip = Arc::new(AudioClip::load(path)?);

        self.teardown();
        let playback = FilePlayback::start(clip, self.tap.clone())?;
        self.ensure_node(playback.sample_rate())?;
        self.source = Source::File(playback);
        info!("Playing {}", path.display());
        Ok(())
    }

    /// Stop file playback; no-op when no file is playing
    pub fn stop_file(&mut self) {
        if matches!(self.source, Source::File(_)) {
            self.teardown();
            info!("File playback stopped");
        }
    }

    /// Stop whatever source is running
    pub fn stop(&mut self) {
        self.teardown();
    }

    /// Feed everything the source produced since last frame and analyse
    pub fn analyse(&mut self) -> Option<AnalysisFrame> {
        let node = self.node.as_mut()?;
        let samples = self.tap.drain();
        node.push_samples(&samples);
        Some(node.analyse())
    }

    // Dropping the cpal stream stops it
    fn teardown(&mut self) {
        if !matches!(self.source, Source::Idle) {
            debug!("Tearing down audio source");
        }
        self.source = Source::Idle;
        self.tap.clear();
        if let Some(node) = self.node.as_mut() {
            node.clear_input();
        }
    }

    fn ensure_node(&mut self, sample_rate: u32) -> Result<(), AudioError> {
        let matches_rate = self
            .node
            .as_ref()
            .is_some_and(|node| node.sample_rate() == sample_rate);
        if !matches_rate {
            debug!("Analyser sample rate -> {}Hz", sample_rate);
            self.node = Some(AnalysisNode::new(self.fft_config.with_sample_rate(sample_rate))?);
        }
        Ok(())
    }
}
