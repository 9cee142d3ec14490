//! Frame output: CPU rasteriser and the wgpu window presenter.

mod gpu;
mod raster;

pub use gpu::{BlitUniforms, RenderSystem};
pub use raster::Rasterizer;
