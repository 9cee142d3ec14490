//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use shardwave::params::{GainConfig, PartitionConfig, RecordingConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "shardwave")]
#[command(about = "Audio-reactive recursive noise partition installation", long_about = None)]
pub struct Args {
    /// WAV file to play and analyse
    #[arg(long, value_name = "WAV")]
    pub file: Option<PathBuf>,

    /// Start with live input from the default capture device
    #[arg(long, conflicts_with = "file")]
    pub live: bool,

    /// Feature sensitivity multiplier (0-100)
    #[arg(long, value_name = "FACTOR", default_value = "1.0")]
    pub sensitivity: f32,

    /// Split attempts before the composition saturates (50-300)
    #[arg(long, value_name = "COUNT", default_value = "150")]
    pub max_splits: u32,

    /// Fixed RNG seed for reproducible partitions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Canvas width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Canvas height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Render offline to PNG frames (duration in seconds, needs --file)
    #[arg(long, value_name = "SECONDS", requires = "file")]
    pub record: Option<f32>,

    /// Output directory for recording mode
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output: PathBuf,

    /// Load sketch parameters from a JSON preset file
    #[arg(long, value_name = "JSON")]
    pub preset: Option<PathBuf>,

    /// Save sketch parameters to a JSON preset file on exit
    #[arg(long, value_name = "JSON")]
    pub save_preset: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn gain_config(&self) -> GainConfig {
        GainConfig {
            sensitivity: self.sensitivity,
            ..Default::default()
        }
    }

    pub fn partition_config(&self) -> PartitionConfig {
        PartitionConfig {
            max_splits: self.max_splits,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        let width = self.width.max(1);
        let height = self.height.max(1);
        RenderConfig {
            window_width: width,
            window_height: height,
            canvas_width: width,
            canvas_height: height,
        }
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| RecordingConfig {
            output_dir: self.output.clone(),
            ..RecordingConfig::new(duration)
        })
    }
}
