//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (Hz, pixels, frames, byte levels)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod partition;
mod render;

// Re-export all types
pub use audio::{FFTConfig, GainConfig};
pub use partition::{AudioReactiveMapping, PartitionConfig};
pub use render::{RecordingConfig, RenderConfig};
