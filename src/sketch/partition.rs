//! Audio-reactive recursive partition sketch.

use glam::DVec2;

use super::{Canvas, ParamDescriptor, Sketch, SketchParams};
use crate::audio::FeatureVector;
use crate::color::Hsb;
use crate::params::{AudioReactiveMapping, PartitionConfig};
use crate::partition::PartitionEngine;

const MAX_POLYS: &str = "maxPolys";
const CHAOS: &str = "chaos";
const OUTLINES: &str = "outlines";
const BACKGROUND: &str = "background";

/// Off-white paper tone
const DEFAULT_BACKGROUND: &str = "#f5f5f5";

const OUTLINE_ALPHA: f32 = 0.8;
const OUTLINE_WIDTH: f32 = 1.5;

/// Energy splits cells, bass wipes a finished composition, treble varies
/// the colours
pub struct PartitionSketch {
    params: SketchParams,
    config: PartitionConfig,
    mapping: AudioReactiveMapping,
    engine: Option<PartitionEngine>,
}

impl PartitionSketch {
    pub fn new(config: PartitionConfig, mapping: AudioReactiveMapping) -> Self {
        let params = SketchParams::new()
            .with(
                MAX_POLYS,
                ParamDescriptor::slider("Max Partitions", config.max_splits as f64, 50.0, 300.0, 10.0),
            )
            .with(CHAOS, ParamDescriptor::slider("Explosion", 50.0, 0.0, 200.0, 5.0))
            .with(OUTLINES, ParamDescriptor::checkbox("Outlines", true))
            .with(BACKGROUND, ParamDescriptor::color("Background", DEFAULT_BACKGROUND));

        Self {
            params,
            config,
            mapping,
            engine: None,
        }
    }

    /// Engine state, available after `setup`
    pub fn engine(&self) -> Option<&PartitionEngine> {
        self.engine.as_ref()
    }

    fn max_polys(&self) -> u32 {
        self.params.number(MAX_POLYS).unwrap_or(150.0) as u32
    }
}

impl Sketch for PartitionSketch {
    fn id(&self) -> &'static str {
        "partition"
    }

    fn name(&self) -> &'static str {
        "Noise Partition"
    }

    fn params(&self) -> &SketchParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut SketchParams {
        &mut self.params
    }

    fn setup(&mut self, width: f64, height: f64) {
        let config = PartitionConfig {
            max_splits: self.max_polys(),
            ..self.config.clone()
        };
        self.engine = Some(PartitionEngine::new(width, height, config, self.mapping.clone()));
    }

    fn update(&mut self, features: &FeatureVector) {
        let max_polys = self.max_polys();
        if let Some(engine) = self.engine.as_mut() {
            engine.set_max_splits(max_polys);
            engine.update(features);
        }
    }

    fn draw<C: Canvas>(&self, canvas: &mut C, features: &FeatureVector) {
        let background = self
            .params
            .color(BACKGROUND)
            .unwrap_or(Hsb::new(0.0, 0.0, 0.96));
        canvas.clear(background);

        let Some(engine) = self.engine.as_ref() else {
            return;
        };

        let chaos = self.params.number(CHAOS).unwrap_or(0.0);
        let outlines = self.params.flag(OUTLINES).unwrap_or(true);
        let push = features.bass as f64 * chaos;
        let outline = Hsb::new(0.0, 0.0, 1.0);
        let mut shifted: Vec<DVec2> = Vec::new();

        for poly in engine.polygons() {
            let offset = poly.drift() * push;
            shifted.clear();
            shifted.extend(poly.points().iter().map(|&p| p + offset));

            canvas.fill_polygon(&shifted, poly.color(), 1.0);
            if outlines {
                canvas.stroke_polygon(&shifted, outline, OUTLINE_ALPHA, OUTLINE_WIDTH);
            }
        }
    }

    fn cleanup(&mut self) {
        self.engine = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::ParamValue;

    /// Records draw calls instead of rasterising
    #[derive(Default)]
    struct RecordingCanvas {
        cleared: Vec<Hsb>,
        fills: Vec<Vec<DVec2>>,
        strokes: usize,
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> (u32, u32) {
            (400, 300)
        }

        fn clear(&mut self, color: Hsb) {
            self.cleared.push(color);
        }

        fn fill_polygon(&mut self, points: &[DVec2], _color: Hsb, _alpha: f32) {
            self.fills.push(points.to_vec());
        }

        fn stroke_polygon(&mut self, _points: &[DVec2], _color: Hsb, _alpha: f32, _width: f32) {
            self.strokes += 1;
        }
    }

    fn sketch() -> PartitionSketch {
        let config = PartitionConfig {
            seed: Some(9),
            ..Default::default()
        };
        let mut sketch = PartitionSketch::new(config, AudioReactiveMapping::default());
        sketch.setup(400.0, 300.0);
        sketch
    }

    fn loud(bass: f32) -> FeatureVector {
        FeatureVector {
            bass,
            mid: 0.5,
            treble: 0.5,
            energy: 0.8,
            level: 0.8,
            ..Default::default()
        }
    }

    #[test]
    fn test_draw_before_setup_only_clears() {
        let sketch = PartitionSketch::new(PartitionConfig::default(), AudioReactiveMapping::default());
        let mut canvas = RecordingCanvas::default();
        sketch.draw(&mut canvas, &FeatureVector::silent());

        assert_eq!(canvas.cleared.len(), 1);
        assert!(canvas.fills.is_empty());
    }

    #[test]
    fn test_draws_every_cell_with_outlines() {
        let mut sketch = sketch();
        for _ in 0..20 {
            sketch.update(&loud(0.0));
        }
        let cells = sketch.engine().unwrap().polygons().len();

        let mut canvas = RecordingCanvas::default();
        sketch.draw(&mut canvas, &loud(0.0));
        assert_eq!(canvas.fills.len(), cells);
        assert_eq!(canvas.strokes, cells);

        sketch.params_mut().set(OUTLINES, ParamValue::Flag(false)).unwrap();
        let mut canvas = RecordingCanvas::default();
        sketch.draw(&mut canvas, &loud(0.0));
        assert_eq!(canvas.strokes, 0);
    }

    #[test]
    fn test_bass_displaces_cells_along_drift() {
        let sketch = sketch();
        let poly = &sketch.engine().unwrap().polygons()[0];

        let mut canvas = RecordingCanvas::default();
        sketch.draw(&mut canvas, &loud(0.5));

        let expected = poly.points()[0] + poly.drift() * 0.5 * 50.0;
        assert!((canvas.fills[0][0] - expected).length() < 1e-9);
    }

    #[test]
    fn test_max_polys_slider_drives_engine() {
        let mut sketch = sketch();
        sketch.params_mut().set(MAX_POLYS, ParamValue::Number(60.0)).unwrap();
        sketch.update(&loud(0.0));

        assert_eq!(sketch.engine().unwrap().max_splits(), 60);
    }
}
