//! JSON preset files: `{ "<sketch id>": { "<param key>": value } }`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::{ParamValue, Sketch};
use crate::error::PresetError;

pub type PresetFile = BTreeMap<String, BTreeMap<String, ParamValue>>;

pub fn load_presets(path: &Path) -> Result<PresetFile, PresetError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn save_presets(path: &Path, presets: &PresetFile) -> Result<(), PresetError> {
    let text = serde_json::to_string_pretty(presets)?;
    fs::write(path, text)?;
    Ok(())
}

/// Apply the sketch's entry, warning about and skipping bad values
///
/// Returns the number of values applied
pub fn apply_preset<S: Sketch>(sketch: &mut S, presets: &PresetFile) -> usize {
    let Some(values) = presets.get(sketch.id()) else {
        return 0;
    };

    let errors = sketch.params_mut().apply(values);
    for error in &errors {
        warn!("Preset for '{}': {}", sketch.id(), error);
    }

    let applied = values.len() - errors.len();
    info!("Applied {} preset value(s) to '{}'", applied, sketch.id());
    applied
}

/// Store the sketch's current values under its id
pub fn capture_preset<S: Sketch>(sketch: &S, presets: &mut PresetFile) {
    presets.insert(sketch.id().to_string(), sketch.params().dump());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{AudioReactiveMapping, PartitionConfig};
    use crate::sketch::PartitionSketch;

    fn sketch() -> PartitionSketch {
        PartitionSketch::new(PartitionConfig::default(), AudioReactiveMapping::default())
    }

    #[test]
    fn test_missing_entry_applies_nothing() {
        let mut sketch = sketch();
        let before = sketch.params().clone();

        assert_eq!(apply_preset(&mut sketch, &PresetFile::new()), 0);
        assert_eq!(sketch.params(), &before);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_presets(&path), Err(PresetError::Json(_))));
        assert!(matches!(
            load_presets(&dir.path().join("absent.json")),
            Err(PresetError::Io(_))
        ));
    }
}
