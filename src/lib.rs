//! Shardwave - audio-reactive generative partition installation.
//!
//! Audio is analysed into bass/mid/treble/energy features which drive a
//! recursive noise-partition sketch rendered through a CPU rasteriser.

pub mod audio;
pub mod color;
pub mod error;
pub mod geometry;
pub mod installation;
pub mod noise;
pub mod params;
pub mod partition;
pub mod recording;
pub mod rendering;
pub mod sketch;
