//! CPU polygon rasteriser over an RGBA framebuffer.

use std::path::Path;

use glam::DVec2;
use image::{Rgba, RgbaImage};

use crate::color::Hsb;
use crate::error::RenderError;
use crate::sketch::Canvas;

/// Software canvas: even-odd scanline fill, strokes as edge quads
pub struct Rasterizer {
    image: RgbaImage,
    crossings: Vec<f64>,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
            crossings: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn save_png(&self, path: &Path, frame: usize) -> Result<(), RenderError> {
        self.image.save(path).map_err(|e| RenderError::SaveFrame {
            frame,
            reason: e.to_string(),
        })
    }

    /// Even-odd fill sampling pixel centres
    fn fill(&mut self, points: &[DVec2], rgb: [u8; 3], alpha: f32) {
        if points.len() < 3 || alpha <= 0.0 {
            return;
        }
        let (width, height) = self.image.dimensions();

        let (lo, hi) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let row_start = (lo - 0.5).ceil().max(0.0) as u32;
        let row_end = ((hi - 0.5).floor() + 1.0).clamp(0.0, height as f64) as u32;

        for row in row_start..row_end {
            let yc = row as f64 + 0.5;

            self.crossings.clear();
            let mut prev = points[points.len() - 1];
            for &p in points {
                if (prev.y > yc) != (p.y > yc) {
                    let t = (yc - prev.y) / (p.y - prev.y);
                    self.crossings.push(prev.x + t * (p.x - prev.x));
                }
                prev = p;
            }
            self.crossings.sort_by(f64::total_cmp);

            for span in self.crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0) as u32;
                let x1 = (span[1] - 0.5).ceil().clamp(0.0, width as f64) as u32;
                for x in x0..x1 {
                    blend(self.image.get_pixel_mut(x, row), rgb, alpha);
                }
            }
        }
    }
}

fn blend(pixel: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    for (dst, &src) in pixel.0.iter_mut().zip(&rgb) {
        *dst = (src as f32 * a + *dst as f32 * (1.0 - a)).round() as u8;
    }
    pixel.0[3] = 255;
}

impl Canvas for Rasterizer {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Hsb) {
        let [r, g, b] = color.to_rgb();
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Hsb, alpha: f32) {
        self.fill(points, color.to_rgb(), alpha);
    }

    fn stroke_polygon(&mut self, points: &[DVec2], color: Hsb, alpha: f32, width: f32) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let rgb = color.to_rgb();
        let half = width as f64 / 2.0;

        let mut prev = points[points.len() - 1];
        for &p in points {
            let dir = p - prev;
            if dir.length_squared() > 0.0 {
                let normal = dir.perp().normalize() * half;
                let quad = [prev + normal, p + normal, p - normal, prev - normal];
                self.fill(&quad, rgb, alpha);
            }
            prev = p;
        }
    }
}
