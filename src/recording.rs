//! Headless offline rendering of a clip to numbered PNG frames.
//!
//! Audio is analysed in lockstep with the frame clock instead of in real
//! time, so every run over the same clip and seed produces the same frames.

use std::fs;

use tracing::info;

use crate::audio::{write_mono_wav, AnalysisNode, AudioClip};
use crate::error::RecordingError;
use crate::installation::FrameLoop;
use crate::params::{FFTConfig, RecordingConfig};
use crate::rendering::Rasterizer;
use crate::sketch::Sketch;

/// What a recording run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSummary {
    pub frames: usize,
    pub audio_samples: usize,
}

/// Render `config.total_frames()` frames of `frame_loop` driven by `clip`
///
/// Past the end of the clip the analyser is fed silence.
pub fn record<S: Sketch>(
    frame_loop: &mut FrameLoop<S>,
    clip: &AudioClip,
    fft_config: &FFTConfig,
    config: &RecordingConfig,
    canvas_size: (u32, u32),
) -> Result<RecordingSummary, RecordingError> {
    fs::create_dir_all(config.frames_dir())?;

    let sample_rate = clip.sample_rate;
    let mut node = AnalysisNode::new(fft_config.with_sample_rate(sample_rate))?;
    let mono = clip.mono_mix();
    let total_frames = config.total_frames();
    let fps = config.fps.max(1) as u64;

    let mut raster = Rasterizer::new(canvas_size.0, canvas_size.1);
    frame_loop.setup(canvas_size.0 as f64, canvas_size.1 as f64);

    info!(
        "Recording {} frames @ {}fps to {}",
        total_frames,
        fps,
        config.output_dir.display()
    );

    let mut silence = Vec::new();
    for frame in 0..total_frames {
        // Integer frame boundaries keep the audio clock drift-free
        let start = (frame as u64 * sample_rate as u64 / fps) as usize;
        let end = ((frame as u64 + 1) * sample_rate as u64 / fps) as usize;

        let available = &mono[start.min(mono.len())..end.min(mono.len())];
        node.push_samples(available);
        let missing = (end - start) - available.len();
        if missing > 0 {
            silence.resize(missing, 0.0);
            node.push_samples(&silence);
        }

        let analysis = node.analyse();
        frame_loop.step(Some(&analysis));
        frame_loop.draw(&mut raster);
        raster.save_png(&config.frame_path(frame), frame)?;

        if (frame + 1) as u64 % fps == 0 {
            info!("Recorded {}/{} frames", frame + 1, total_frames);
        }
    }

    let recorded_samples = (total_frames as u64 * sample_rate as u64 / fps) as usize;
    let audio = &mono[..recorded_samples.min(mono.len())];
    write_mono_wav(&config.audio_path(), audio, sample_rate)?;

    info!("Recording complete: {}", config.output_dir.display());

    Ok(RecordingSummary {
        frames: total_frames,
        audio_samples: audio.len(),
    })
}
