//! Whole-engine properties of the recursive partition.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shardwave::audio::FeatureVector;
use shardwave::geometry::{curve_polygon_split, point_in_polygon, polygon_area};
use shardwave::params::{AudioReactiveMapping, PartitionConfig};
use shardwave::partition::{PartitionEngine, PartitionState, SplitOutcome};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;

fn engine(seed: u64, max_splits: u32) -> PartitionEngine {
    let config = PartitionConfig {
        max_splits,
        seed: Some(seed),
        ..Default::default()
    };
    PartitionEngine::new(WIDTH, HEIGHT, config, AudioReactiveMapping::default())
}

fn loud() -> FeatureVector {
    FeatureVector {
        bass: 0.2,
        mid: 0.6,
        treble: 0.4,
        energy: 0.9,
        level: 0.9,
        ..Default::default()
    }
}

#[test]
fn areas_sum_to_canvas_after_every_split() {
    let canvas = WIDTH * HEIGHT;

    for seed in 0..4 {
        let mut engine = engine(seed, 150);
        let mut splits = 0;

        while let Some(outcome) = engine.update(&loud()) {
            if outcome == SplitOutcome::Split {
                splits += 1;
            }
            let total = engine.total_area();
            assert!(
                (total - canvas).abs() <= canvas * 1e-6,
                "seed {}: total area {} drifted from {}",
                seed,
                total,
                canvas
            );
            if matches!(engine.state(), PartitionState::Saturated { .. }) {
                break;
            }
        }

        assert!(splits > 10, "seed {} only managed {} splits", seed, splits);
        assert_eq!(engine.polygons().len(), splits + 1);
    }
}

#[test]
fn every_canvas_point_lies_in_exactly_one_cell() {
    let mut engine = engine(7, 80);
    for _ in 0..80 {
        engine.update(&loud());
    }
    assert!(engine.polygons().len() > 10);

    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..2000 {
        let p = DVec2::new(rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
        let owners = engine
            .polygons()
            .iter()
            .filter(|poly| point_in_polygon(p, poly.points()))
            .count();
        assert_eq!(owners, 1, "point {:?} owned by {} cells", p, owners);
    }
}

#[test]
fn split_children_partition_the_parent() {
    let square = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(100.0, 0.0),
        DVec2::new(100.0, 100.0),
        DVec2::new(0.0, 100.0),
    ];
    let curve = [
        DVec2::new(-5.0, 30.0),
        DVec2::new(20.0, 45.0),
        DVec2::new(45.0, 20.0),
        DVec2::new(70.0, 60.0),
        DVec2::new(105.0, 55.0),
    ];
    let [a, b] = curve_polygon_split(&curve, &square, (30, 30), 20.0).expect("curve crosses twice");

    assert!((polygon_area(&a) + polygon_area(&b) - 10_000.0).abs() < 1e-6);

    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..1000 {
        let p = DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
        let in_a = point_in_polygon(p, &a);
        let in_b = point_in_polygon(p, &b);
        assert!(in_a != in_b, "point {:?} in a={} b={}", p, in_a, in_b);
    }
}

#[test]
fn saturation_reached_within_budget_even_when_splits_fail() {
    // Tiny canvas: most curves leave after one step and many attempts miss
    let config = PartitionConfig {
        max_splits: 40,
        seed: Some(3),
        ..Default::default()
    };
    let mut engine = PartitionEngine::new(30.0, 30.0, config, AudioReactiveMapping::default());

    for _ in 0..40 {
        assert!(engine.update(&loud()).is_some());
    }
    assert_eq!(engine.split_attempts(), 40);
    assert!(matches!(engine.state(), PartitionState::Saturated { .. }));
    assert!((engine.total_area() - 900.0).abs() < 900.0 * 1e-6);
}

#[test]
fn cells_keep_positive_area_and_tight_bounds() {
    let mut engine = engine(11, 60);
    for _ in 0..60 {
        engine.update(&loud());
    }

    for poly in engine.polygons() {
        assert!(poly.area() > 0.0);
        assert!(poly.points().len() >= 3);
        for p in poly.points() {
            assert!(p.x >= poly.bounds().min.x && p.x <= poly.bounds().max.x);
            assert!(p.y >= poly.bounds().min.y && p.y <= poly.bounds().max.y);
        }
    }
}
