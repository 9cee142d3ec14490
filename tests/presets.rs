//! Preset files on disk driving sketch parameters.

use std::fs;

use shardwave::params::{AudioReactiveMapping, PartitionConfig};
use shardwave::sketch::{
    apply_preset, capture_preset, load_presets, save_presets, ParamValue, PartitionSketch,
    PresetFile, Sketch,
};

fn sketch() -> PartitionSketch {
    PartitionSketch::new(PartitionConfig::default(), AudioReactiveMapping::default())
}

#[test]
fn captured_values_survive_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("presets.json");

    let mut original = sketch();
    original
        .params_mut()
        .set("maxPolys", ParamValue::Number(220.0))
        .unwrap();
    original
        .params_mut()
        .set("outlines", ParamValue::Flag(false))
        .unwrap();

    let mut presets = PresetFile::new();
    capture_preset(&original, &mut presets);
    save_presets(&path, &presets).unwrap();

    let loaded = load_presets(&path).unwrap();
    let mut restored = sketch();
    assert_eq!(apply_preset(&mut restored, &loaded), 4);
    assert_eq!(restored.params().number("maxPolys"), Some(220.0));
    assert_eq!(restored.params().flag("outlines"), Some(false));
}

#[test]
fn hand_written_file_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("presets.json");
    fs::write(
        &path,
        r##"{
            "partition": {
                "maxPolys": 1000,
                "chaos": 42,
                "background": "not a colour",
                "outlines": false,
                "glow": 3
            },
            "other": { "speed": 2 }
        }"##,
    )
    .unwrap();

    let presets = load_presets(&path).unwrap();
    let mut sketch = sketch();
    // Unknown key and bad colour are skipped
    assert_eq!(apply_preset(&mut sketch, &presets), 3);

    let params = sketch.params();
    assert_eq!(params.number("maxPolys"), Some(300.0));
    assert_eq!(params.number("chaos"), Some(40.0));
    assert_eq!(params.flag("outlines"), Some(false));
    assert!(params.color("background").is_some());
}

#[test]
fn capture_keeps_other_sketches() {
    let mut presets = PresetFile::new();
    presets.insert("other".to_string(), Default::default());

    capture_preset(&sketch(), &mut presets);
    assert!(presets.contains_key("other"));
    assert_eq!(presets["partition"].len(), 4);
}
