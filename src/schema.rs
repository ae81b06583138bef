//! Project file schema.
//!
//! Two on-disk formats exist:
//!
//! - **v1.x** (single layer): `{ "version": "1.1", "emitter": {..}, "particle": {..} }`
//! - **v2.0** (layered): `{ "version": "2.0", "layers": [{ "name", "visible", "emitter", "particle" }] }`
//!
//! Every field is optional on load. A field that is missing, `null`, or of the
//! wrong type decodes as `None` and the emitter default applies, so a damaged
//! file still yields a renderable project. The same structs double as partial
//! updates: presets and the randomizer only fill the fields they change.

use crate::canvas::BlendMode;
use crate::emitter::EmitterShape;
use crate::error::ProjectError;
use crate::particle::ParticleShape;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Version tag written by layered exports.
pub const FORMAT_VERSION: &str = "2.0";

/// Version tag written by single-layer exports.
pub const LEGACY_VERSION: &str = "1.1";

/// Decode a field, treating type mismatches like a missing field.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            log::debug!("ignoring malformed field: {}", e);
            Ok(None)
        }
    }
}

/// Emission and emitter-shape settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmitterData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Particles per second.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Base particle lifetime in seconds.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Spread cone in degrees.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f64>,
    /// Emission direction in degrees, 0 = +x, 90 = down.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter_shape: Option<EmitterShape>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter_radius: Option<f64>,
    /// Circle emitters only: spawn inside the disc (`true`) or on its rim.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter_filled: Option<bool>,
}

/// Particle appearance settings, plus friction.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticleData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub shape: Option<ParticleShape>,
    /// Glyph drawn by the `emoji` shape.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size_start: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size_end: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color_start: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color_end: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub opacity_start: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub opacity_end: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    /// Velocity kept per 1/60 s; 1 = no friction.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub friction: Option<f64>,
}

/// One layer: identity plus emitter and particle settings.
///
/// Used both as the serialized layer and as a partial update, where `None`
/// means "leave unchanged".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LayerData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub emitter: Option<EmitterData>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub particle: Option<ParticleData>,
}

impl LayerData {
    /// Decode one layer from arbitrary JSON; non-objects decode as empty.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Single-layer v1.x export.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LegacyProject {
    pub version: String,
    pub emitter: EmitterData,
    pub particle: ParticleData,
}

/// Layered v2.0 export.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProjectFile {
    pub version: String,
    pub layers: Vec<LayerData>,
}

impl ProjectFile {
    pub fn new(layers: Vec<LayerData>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            layers,
        }
    }

    pub fn to_value(&self) -> Value {
        // Plain data with string keys always converts.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Which schema a loaded document uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectFormat {
    Layered,
    Legacy,
}

impl ProjectFormat {
    /// `version == "2.0"` with a `layers` array is layered; anything else,
    /// including malformed input, is treated as a legacy single layer.
    pub fn detect(value: &Value) -> Self {
        let is_v2 = value.get("version").and_then(Value::as_str) == Some(FORMAT_VERSION);
        let has_layers = value.get("layers").map_or(false, Value::is_array);
        if is_v2 && has_layers {
            ProjectFormat::Layered
        } else {
            ProjectFormat::Legacy
        }
    }
}

/// Decode the layers of any supported document.
///
/// Names are filled in as `Layer N` where absent or blank; legacy documents
/// always yield exactly one layer named `Layer 1`. The result may be empty
/// only for a layered document with an empty `layers` array.
pub fn decode_layers(value: &Value) -> Vec<LayerData> {
    match ProjectFormat::detect(value) {
        ProjectFormat::Layered => {
            let entries = value
                .get("layers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let mut layer = LayerData::from_value(entry);
                    if layer.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                        layer.name = Some(format!("Layer {}", i + 1));
                    }
                    layer
                })
                .collect()
        }
        ProjectFormat::Legacy => {
            let mut layer = LayerData::from_value(value);
            layer.name = Some("Layer 1".to_string());
            vec![layer]
        }
    }
}

/// Parse project text into layer data.
pub fn parse_project(text: &str) -> Result<Vec<LayerData>, ProjectError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(decode_layers(&value))
}
