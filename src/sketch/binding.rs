//! Named, ranged sketch parameters.
//!
//! UI layers (sliders, colour pickers, checkboxes) and preset files both go
//! through [`SketchParams::set`], which validates the value kind and clamps
//! numbers into range. Sketches read values back every frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Hsb;
use crate::error::ParamError;

/// Control type presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Slider,
    Color,
    Checkbox,
}

/// Parameter value as stored and persisted
///
/// Serialises to a bare JSON number, bool or `"#rrggbb"` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
    Color(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    pub kind: ParamKind,
    pub value: ParamValue,
    /// Slider lower bound (unused by other kinds)
    pub min: f64,
    pub max: f64,
    /// Slider increment; 0 = continuous
    pub step: f64,
    pub display_name: String,
}

impl ParamDescriptor {
    pub fn slider(display_name: &str, value: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            kind: ParamKind::Slider,
            value: ParamValue::Number(snap_to_step(value, min, max, step)),
            min,
            max,
            step,
            display_name: display_name.to_string(),
        }
    }

    pub fn color(display_name: &str, hex: &str) -> Self {
        Self {
            kind: ParamKind::Color,
            value: ParamValue::Color(hex.to_lowercase()),
            min: 0.0,
            max: 0.0,
            step: 0.0,
            display_name: display_name.to_string(),
        }
    }

    pub fn checkbox(display_name: &str, value: bool) -> Self {
        Self {
            kind: ParamKind::Checkbox,
            value: ParamValue::Flag(value),
            min: 0.0,
            max: 0.0,
            step: 0.0,
            display_name: display_name.to_string(),
        }
    }

    /// Check `value` against this descriptor and normalise it
    fn accept(&self, key: &str, value: ParamValue) -> Result<ParamValue, ParamError> {
        let wrong_kind = |expected: &'static str| ParamError::WrongKind {
            key: key.to_string(),
            expected,
        };

        match (self.kind, value) {
            (ParamKind::Slider, ParamValue::Number(v)) => {
                if !v.is_finite() {
                    return Err(ParamError::NotFinite(key.to_string()));
                }
                Ok(ParamValue::Number(snap_to_step(v, self.min, self.max, self.step)))
            }
            (ParamKind::Color, ParamValue::Color(hex)) => match Hsb::from_hex(&hex) {
                Some(_) => Ok(ParamValue::Color(hex.to_lowercase())),
                None => Err(ParamError::BadColor {
                    key: key.to_string(),
                    value: hex,
                }),
            },
            (ParamKind::Checkbox, ParamValue::Flag(b)) => Ok(ParamValue::Flag(b)),
            (ParamKind::Slider, _) => Err(wrong_kind("number")),
            (ParamKind::Color, _) => Err(wrong_kind("color")),
            (ParamKind::Checkbox, _) => Err(wrong_kind("boolean")),
        }
    }
}

/// Clamp to `[min, max]` and round to the nearest `step` counted from `min`
///
/// Non-finite input falls back to `min`
fn snap_to_step(value: f64, min: f64, max: f64, step: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    let v = value.clamp(min, max);
    if step > 0.0 {
        (min + ((v - min) / step).round() * step).min(max)
    } else {
        v
    }
}

/// A sketch's parameter table, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SketchParams {
    entries: BTreeMap<String, ParamDescriptor>,
}

impl SketchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn with(mut self, key: &str, descriptor: ParamDescriptor) -> Self {
        self.entries.insert(key.to_string(), descriptor);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamDescriptor> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamDescriptor)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)?.value {
            ParamValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)?.value {
            ParamValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    pub fn color(&self, key: &str) -> Option<Hsb> {
        match &self.get(key)?.value {
            ParamValue::Color(hex) => Hsb::from_hex(hex),
            _ => None,
        }
    }

    /// Validate, clamp and store a new value
    pub fn set(&mut self, key: &str, value: ParamValue) -> Result<(), ParamError> {
        let descriptor = self
            .entries
            .get_mut(key)
            .ok_or_else(|| ParamError::Unknown(key.to_string()))?;
        descriptor.value = descriptor.accept(key, value)?;
        Ok(())
    }

    /// Current values, for persistence
    pub fn dump(&self) -> BTreeMap<String, ParamValue> {
        self.entries
            .iter()
            .map(|(k, d)| (k.clone(), d.value.clone()))
            .collect()
    }

    /// Apply every acceptable value; rejected entries are returned
    pub fn apply(&mut self, values: &BTreeMap<String, ParamValue>) -> Vec<ParamError> {
        values
            .iter()
            .filter_map(|(key, value)| self.set(key, value.clone()).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SketchParams {
        SketchParams::new()
            .with("maxPolys", ParamDescriptor::slider("Max Partitions", 150.0, 50.0, 300.0, 10.0))
            .with("outlines", ParamDescriptor::checkbox("Outlines", true))
            .with("background", ParamDescriptor::color("Background", "#F5F5F5"))
    }

    #[test]
    fn test_slider_clamps_and_snaps() {
        let mut p = params();

        p.set("maxPolys", ParamValue::Number(1000.0)).unwrap();
        assert_eq!(p.number("maxPolys"), Some(300.0));

        p.set("maxPolys", ParamValue::Number(10.0)).unwrap();
        assert_eq!(p.number("maxPolys"), Some(50.0));

        p.set("maxPolys", ParamValue::Number(123.0)).unwrap();
        assert_eq!(p.number("maxPolys"), Some(120.0));
    }

    #[test]
    fn test_initial_slider_value_snaps() {
        let d = ParamDescriptor::slider("Max Partitions", 155.0, 50.0, 300.0, 10.0);
        assert_eq!(d.value, ParamValue::Number(160.0));

        let d = ParamDescriptor::slider("Max Partitions", 20.0, 50.0, 300.0, 10.0);
        assert_eq!(d.value, ParamValue::Number(50.0));

        let d = ParamDescriptor::slider("Explosion", 12.3, 0.0, 200.0, 0.0);
        assert_eq!(d.value, ParamValue::Number(12.3));
    }

    #[test]
    fn test_rejections() {
        let mut p = params();

        assert_eq!(
            p.set("nope", ParamValue::Flag(true)),
            Err(ParamError::Unknown("nope".to_string()))
        );
        assert_eq!(
            p.set("maxPolys", ParamValue::Number(f64::NAN)),
            Err(ParamError::NotFinite("maxPolys".to_string()))
        );
        assert!(matches!(
            p.set("outlines", ParamValue::Number(1.0)),
            Err(ParamError::WrongKind { expected: "boolean", .. })
        ));
        assert!(matches!(
            p.set("background", ParamValue::Color("#zzz".to_string())),
            Err(ParamError::BadColor { .. })
        ));

        // Nothing changed
        assert_eq!(p, params());
    }

    #[test]
    fn test_dump_apply_round_trip() {
        let mut source = params();
        source.set("maxPolys", ParamValue::Number(200.0)).unwrap();
        source.set("outlines", ParamValue::Flag(false)).unwrap();
        source
            .set("background", ParamValue::Color("#102030".to_string()))
            .unwrap();

        let mut target = params();
        let errors = target.apply(&source.dump());

        assert!(errors.is_empty());
        assert_eq!(target, source);
    }

    #[test]
    fn test_apply_skips_bad_entries() {
        let mut p = params();
        let mut values = BTreeMap::new();
        values.insert("maxPolys".to_string(), ParamValue::Number(80.0));
        values.insert("ghost".to_string(), ParamValue::Number(1.0));
        values.insert("outlines".to_string(), ParamValue::Color("#000000".to_string()));

        let errors = p.apply(&values);

        assert_eq!(errors.len(), 2);
        assert_eq!(p.number("maxPolys"), Some(80.0));
        assert_eq!(p.flag("outlines"), Some(true));
    }

    #[test]
    fn test_values_serialise_bare() {
        let json = serde_json::to_string(&params().dump()).unwrap();
        assert_eq!(
            json,
            r##"{"background":"#f5f5f5","maxPolys":150.0,"outlines":true}"##
        );

        let back: BTreeMap<String, ParamValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params().dump());
    }
}
