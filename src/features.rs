//! GeoJSON feature records -> trails.
//!
//! Parses in-memory GeoJSON text (no file access) and applies the input
//! filter: a record becomes a [`Trail`] only if it has a non-blank name and a
//! `LineString` geometry with at least one finite `[x, y, ...]` coordinate.
//! Everything else is dropped. Input order is preserved.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{JunctionError, OptionExt, Result, Trail, TrailPoint};

/// A GeoJSON FeatureCollection (only `features` is read).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<TrailFeature>,
}

/// A GeoJSON Feature carrying a trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailFeature {
    /// Flat records (e.g. database rows) may carry the name at top level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
}

/// GeoJSON geometry object; coordinates are kept raw until conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureGeometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

impl TrailFeature {
    /// `properties.name`, falling back to a top-level `name`. Blank names count
    /// as missing.
    pub fn trail_name(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get("name"))
            .and_then(Value::as_str)
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.trim().is_empty()))
    }

    /// Convert to a trail. `index` is only used in error messages.
    pub fn to_trail(&self, index: usize) -> Result<Trail> {
        let name = self.trail_name().ok_or_missing_name(index)?;
        let geometry = self.geometry.as_ref().ok_or_empty_trail(name)?;

        if !geometry.kind.is_empty() && geometry.kind != "LineString" {
            return Err(JunctionError::InvalidCoordinates {
                name: name.to_string(),
                message: format!("unsupported geometry type '{}'", geometry.kind),
            });
        }

        let points = parse_line_coordinates(name, &geometry.coordinates)?;
        Trail::new(name, points)
    }
}

/// Read `[[x, y, ...], ...]`. Extra ordinates (elevation) are ignored.
fn parse_line_coordinates(name: &str, coordinates: &Value) -> Result<Vec<TrailPoint>> {
    let positions = match coordinates {
        Value::Null => return Ok(Vec::new()),
        Value::Array(positions) => positions,
        other => {
            return Err(JunctionError::InvalidCoordinates {
                name: name.to_string(),
                message: format!("expected an array of positions, got {}", other),
            })
        }
    };

    positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            parse_position(position).ok_or_else(|| JunctionError::InvalidCoordinates {
                name: name.to_string(),
                message: format!("position {} is not a finite [x, y] pair: {}", i, position),
            })
        })
        .collect()
}

fn parse_position(position: &Value) -> Option<TrailPoint> {
    let ordinates = position.as_array()?;
    if ordinates.len() < 2 {
        return None;
    }
    let point = TrailPoint::new(ordinates[0].as_f64()?, ordinates[1].as_f64()?);
    point.is_finite().then_some(point)
}

/// Keep the records that form valid trails, in order.
pub fn trails_from_features(features: &[TrailFeature]) -> Vec<Trail> {
    let trails: Vec<Trail> = features
        .iter()
        .enumerate()
        .filter_map(|(i, feature)| match feature.to_trail(i) {
            Ok(trail) => Some(trail),
            Err(e) => {
                debug!("[Features] Dropping record {}: {}", i, e);
                None
            }
        })
        .collect();

    info!(
        "[Features] Loaded {} trails from {} records ({} dropped)",
        trails.len(),
        features.len(),
        features.len() - trails.len()
    );

    trails
}

/// Parse a GeoJSON FeatureCollection and keep the records that form trails.
///
/// Fails only if the text is not a FeatureCollection-shaped JSON document.
///
/// # Example
/// ```
/// use trail_junctions::trails_from_geojson_str;
///
/// let text = r#"{
///     "type": "FeatureCollection",
///     "features": [
///         {"type": "Feature", "properties": {"name": "Mesa"},
///          "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 0]]}},
///         {"type": "Feature", "properties": {},
///          "geometry": {"type": "LineString", "coordinates": [[5, 5], [6, 6]]}}
///     ]
/// }"#;
///
/// let trails = trails_from_geojson_str(text).unwrap();
/// assert_eq!(trails.len(), 1);
/// assert_eq!(trails[0].name(), "Mesa");
/// ```
pub fn trails_from_geojson_str(text: &str) -> Result<Vec<Trail>> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    Ok(trails_from_features(&collection.features))
}

/// Parse newline-delimited features (one Feature object per line).
///
/// Lines that are not valid JSON features are skipped with a warning.
pub fn trails_from_geojson_lines(text: &str) -> Vec<Trail> {
    let features: Vec<TrailFeature> = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .filter_map(|(n, line)| match serde_json::from_str::<TrailFeature>(line) {
            Ok(feature) => Some(feature),
            Err(e) => {
                warn!("[Features] Skipping invalid line {}: {}", n + 1, e);
                None
            }
        })
        .collect();

    trails_from_features(&features)
}
