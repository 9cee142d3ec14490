//! Recursive noise partition of the canvas.

mod curve;
mod engine;
mod polygon;

pub use curve::{generate_curve, WalkParams};
pub use engine::{PartitionEngine, PartitionState, SplitOutcome};
pub use polygon::{random_drift, Polygon};
