//! cpal streams feeding the sample tap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{info, warn};

use super::{AudioClip, SampleTap};
use crate::error::AudioError;

/// Default input device streaming into a tap (stream stops on drop)
pub struct LiveInput {
    _stream: Stream,
    sample_rate: u32,
}

impl LiveInput {
    pub fn start(tap: SampleTap) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoDevice("input"))?;
        let supported = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;

        info!(
            "Live input: {} @ {}Hz, {} channels ({:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            config.channels,
            sample_format
        );

        let stream = match sample_format {
            SampleFormat::F32 => build_input::<f32>(&device, &config, tap)?,
            SampleFormat::I16 => build_input::<i16>(&device, &config, tap)?,
            SampleFormat::U16 => build_input::<u16>(&device, &config, tap)?,
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        };
        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    tap: SampleTap,
) -> Result<Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                tap.push_interleaved(data.iter().map(|&s| f32::from_sample(s)), channels);
            },
            |err| warn!("Audio input stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

/// Read head over a clip, resampling to the device rate by linear
/// interpolation
struct PlaybackCursor {
    clip: Arc<AudioClip>,
    position: f64,
    step: f64,
}

impl PlaybackCursor {
    /// Next frame for `out_channels`, or `None` once the clip is exhausted
    fn next_frame(&mut self, out: &mut [f32]) -> Option<()> {
        let channels = self.clip.channels.max(1) as usize;
        let frames = self.clip.frames();
        let index = self.position.floor() as usize;
        if index >= frames {
            return None;
        }

        let frac = (self.position - index as f64) as f32;
        let next = (index + 1).min(frames - 1);
        let sample = |frame: usize, ch: usize| self.clip.samples[frame * channels + ch.min(channels - 1)];

        for (ch, slot) in out.iter_mut().enumerate() {
            let a = sample(index, ch);
            let b = sample(next, ch);
            *slot = a + (b - a) * frac;
        }

        self.position += self.step;
        Some(())
    }
}

/// Clip playback on the default output device, tapped for analysis
pub struct FilePlayback {
    _stream: Stream,
    playing: Arc<AtomicBool>,
    sample_rate: u32,
}

impl FilePlayback {
    pub fn start(clip: Arc<AudioClip>, tap: SampleTap) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice("output"))?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;

        info!(
            "Playback: {} @ {}Hz (clip {}Hz, {:.1}s)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            clip.sample_rate,
            clip.duration_secs()
        );

        let cursor = PlaybackCursor {
            step: clip.sample_rate as f64 / sample_rate as f64,
            clip,
            position: 0.0,
        };
        let playing = Arc::new(AtomicBool::new(true));

        let stream = match sample_format {
            SampleFormat::F32 => build_output::<f32>(&device, &config, cursor, tap, playing.clone())?,
            SampleFormat::I16 => build_output::<i16>(&device, &config, cursor, tap, playing.clone())?,
            SampleFormat::U16 => build_output::<u16>(&device, &config, cursor, tap, playing.clone())?,
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        };
        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            playing,
            sample_rate,
        })
    }

    /// False once the clip has played to the end
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn build_output<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut cursor: PlaybackCursor,
    tap: SampleTap,
    playing: Arc<AtomicBool>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut frame = vec![0.0f32; channels];
    let mut played = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                played.clear();
                for out in data.chunks_mut(channels) {
                    if cursor.next_frame(&mut frame).is_some() {
                        for (slot, &s) in out.iter_mut().zip(&frame) {
                            *slot = T::from_sample(s);
                        }
                        played.extend_from_slice(&frame);
                    } else {
                        out.fill(T::EQUILIBRIUM);
                        playing.store(false, Ordering::Relaxed);
                    }
                }
                tap.push_interleaved(played.iter().copied(), channels);
            },
            |err| warn!("Audio output stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Arc<AudioClip> {
        Arc::new(AudioClip {
            samples,
            channels,
            sample_rate,
        })
    }

    #[test]
    fn test_cursor_interpolates_and_ends() {
        let mut cursor = PlaybackCursor {
            clip: clip(vec![0.0, 1.0, 2.0], 1, 100),
            position: 0.0,
            step: 0.5,
        };
        let mut out = [0.0f32; 1];
        let mut got = Vec::new();
        while cursor.next_frame(&mut out).is_some() {
            got.push(out[0]);
        }

        assert_eq!(got, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.0]);
    }

    #[test]
    fn test_mono_clip_fans_out_to_stereo() {
        let mut cursor = PlaybackCursor {
            clip: clip(vec![0.25, 0.75], 1, 48000),
            position: 0.0,
            step: 1.0,
        };
        let mut out = [0.0f32; 2];
        cursor.next_frame(&mut out).unwrap();

        assert_eq!(out, [0.25, 0.25]);
    }
}
