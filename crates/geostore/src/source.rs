use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Property bag of one input feature.
#[derive(Debug, Clone, Default)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new(map: Map<String, Value>) -> Self { Self(map) }

    #[inline] pub fn keys(&self) -> impl Iterator<Item = &String> { self.0.keys() }

    /// Non-empty text value of the first key in `keys` present (compared
    /// case-insensitively); failing that, of the first key containing any of
    /// `terms`. Numbers are rendered as text.
    pub fn pick(&self, keys: &[&str], terms: &[&str]) -> Option<String> {
        keys.iter()
            .find_map(|key| self.0.iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(key))
                .find_map(|(_, v)| value_text(v)))
            .or_else(|| self.0.iter()
                .filter(|(k, _)| {
                    let k = k.to_lowercase();
                    terms.iter().any(|term| k.contains(term))
                })
                .find_map(|(_, v)| value_text(v)))
    }

    /// String list stored under `key`: a JSON array of strings, or a
    /// comma-separated string.
    pub fn list(&self, key: &str) -> Vec<String> {
        let Some(value) = self.0.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v) else {
            return Vec::new();
        };
        match value {
            Value::Array(items) => items.iter().filter_map(value_text).collect(),
            Value::String(s) => s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
            _ => Vec::new(),
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One input feature: an optional identifier, its properties and its geometry.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Properties,
    pub geometry: Option<Geometry<f64>>,
}

/// Anything that can produce features for ingestion.
pub trait FeatureSource {
    fn features(&self) -> Result<Vec<Feature>, StoreError>;
}

/// GeoJSON text: a FeatureCollection, a single Feature, or a bare geometry.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    text: String,
}

impl GeoJsonSource {
    pub fn new(text: impl Into<String>) -> Self { Self { text: text.into() } }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read GeoJSON file {}", path.display()))?;
        Ok(Self { text })
    }
}

impl FeatureSource for GeoJsonSource {
    fn features(&self) -> Result<Vec<Feature>, StoreError> {
        let root: Value = serde_json::from_str(&self.text)?;
        let kind = root.get("type").and_then(Value::as_str)
            .ok_or_else(|| StoreError::NotGeoJson("missing `type` member".into()))?;

        match kind {
            "FeatureCollection" => root.get("features").and_then(Value::as_array)
                .ok_or_else(|| StoreError::NotGeoJson("FeatureCollection without `features`".into()))?
                .iter()
                .map(parse_feature)
                .collect(),
            "Feature" => Ok(vec![parse_feature(&root)?]),
            _ => Ok(vec![Feature {
                id: None,
                properties: Properties::default(),
                geometry: Some(parse_geometry(&root)?),
            }]),
        }
    }
}

fn parse_feature(value: &Value) -> Result<Feature, StoreError> {
    let id = value.get("id").and_then(value_text);
    let properties = match value.get("properties") {
        Some(Value::Object(map)) => Properties::new(map.clone()),
        _ => Properties::default(),
    };
    let geometry = match value.get("geometry") {
        None | Some(Value::Null) => None,
        Some(geometry) => Some(parse_geometry(geometry)?),
    };
    Ok(Feature { id, properties, geometry })
}

/// Convert a GeoJSON geometry object into a `geo::Geometry`.
pub fn parse_geometry(value: &Value) -> Result<Geometry<f64>, StoreError> {
    let kind = value.get("type").and_then(Value::as_str)
        .ok_or_else(|| StoreError::NotGeoJson("geometry without `type`".into()))?;

    if kind == "GeometryCollection" {
        let members = value.get("geometries").and_then(Value::as_array)
            .ok_or_else(|| StoreError::NotGeoJson("GeometryCollection without `geometries`".into()))?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(
            members.iter().map(parse_geometry).collect::<Result<_, _>>()?
        )));
    }

    let coords = value.get("coordinates")
        .ok_or_else(|| StoreError::InvalidCoordinates(format!("{kind} without `coordinates`")))?;

    Ok(match kind {
        "Point" => Geometry::Point(Point::from(coord(coords)?)),
        "MultiPoint" => Geometry::MultiPoint(MultiPoint::new(
            array(coords)?.iter().map(|c| coord(c).map(Point::from)).collect::<Result<_, _>>()?
        )),
        "LineString" => Geometry::LineString(line_string(coords)?),
        "MultiLineString" => Geometry::MultiLineString(MultiLineString::new(
            array(coords)?.iter().map(line_string).collect::<Result<_, _>>()?
        )),
        "Polygon" => Geometry::Polygon(polygon(coords)?),
        "MultiPolygon" => Geometry::MultiPolygon(MultiPolygon::new(
            array(coords)?.iter().map(polygon).collect::<Result<_, _>>()?
        )),
        other => return Err(StoreError::UnsupportedGeometry(other.to_string())),
    })
}

fn array(value: &Value) -> Result<&Vec<Value>, StoreError> {
    value.as_array().ok_or_else(|| StoreError::InvalidCoordinates(format!("expected array, got {value}")))
}

fn coord(value: &Value) -> Result<Coord<f64>, StoreError> {
    let items = array(value)?;
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
        _ => Err(StoreError::InvalidCoordinates(format!("bad position {value}"))),
    }
}

fn line_string(value: &Value) -> Result<LineString<f64>, StoreError> {
    Ok(LineString::new(array(value)?.iter().map(coord).collect::<Result<_, _>>()?))
}

fn polygon(value: &Value) -> Result<Polygon<f64>, StoreError> {
    let mut rings = array(value)?.iter().map(line_string);
    let exterior = rings.next()
        .ok_or_else(|| StoreError::InvalidCoordinates("polygon without rings".into()))??;
    Ok(Polygon::new(exterior, rings.collect::<Result<_, _>>()?))
}
