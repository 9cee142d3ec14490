//! WAV decoding into normalised float samples.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::error::AudioError;

/// Fully decoded audio clip, interleaved samples in [-1, 1]
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl AudioClip {
    /// Decode a WAV file (float or integer PCM, any channel count)
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let mut reader = WavReader::open(path)
            .map_err(|e| AudioError::Decode(format!("{}: {}", path.display(), e)))?;
        let spec = reader.spec();

        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(AudioError::Decode(format!(
                "{}: invalid header ({} channels @ {}Hz)",
                path.display(),
                spec.channels,
                spec.sample_rate
            )));
        }

        let samples = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>(),
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<Vec<_>, _>>()
            }
        }
        .map_err(|e| AudioError::Decode(format!("{}: {}", path.display(), e)))?;

        debug!(
            "Decoded {}: {} channels @ {}Hz, {} frames",
            path.display(),
            spec.channels,
            spec.sample_rate,
            samples.len() / spec.channels as usize
        );

        Ok(Self {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate.max(1) as f32
    }

    /// Average all channels into one
    pub fn mono_mix(&self) -> Vec<f32> {
        let channels = self.channels.max(1) as usize;
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}

/// Write mono float samples as a 32-bit float WAV
pub fn write_mono_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let encode_err = |e: hound::Error| AudioError::Write(format!("{}: {}", path.display(), e));

    let mut writer = WavWriter::create(path, spec).map_err(encode_err)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(encode_err)?;
    }
    writer.finalize().map_err(encode_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_int16_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(-16384i16).unwrap();
        }
        writer.finalize().unwrap();

        let clip = AudioClip::load(&path).unwrap();
        assert_eq!(clip.channels, 2);
        assert_eq!(clip.sample_rate, 22050);
        assert_eq!(clip.frames(), 100);
        assert!((clip.samples[0] - 0.5).abs() < 1e-6);
        assert!((clip.samples[1] + 0.5).abs() < 1e-6);
        assert!(clip.mono_mix().iter().all(|&s| s.abs() < 1e-6));
    }

    #[test]
    fn test_float_round_trip_through_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let samples: Vec<f32> = (0..441).map(|i| (i as f32 / 441.0) - 0.5).collect();

        write_mono_wav(&path, &samples, 44100).unwrap();
        let clip = AudioClip::load(&path).unwrap();

        assert_eq!(clip.channels, 1);
        assert_eq!(clip.samples, samples);
        assert!((clip.duration_secs() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a.wav");
        std::fs::write(&path, b"definitely not RIFF").unwrap();

        assert!(matches!(AudioClip::load(&path), Err(AudioError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let path = Path::new("/nonexistent/shardwave/missing.wav");
        assert!(matches!(AudioClip::load(path), Err(AudioError::Decode(_))));
    }
}
