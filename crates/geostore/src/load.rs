use std::sync::LazyLock;

use geo::{Geometry, MultiLineString, MultiPolygon};
use regex::Regex;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::geom::building_point;
use crate::manifest::LayerKind;
use crate::record::StreetKind;
use crate::source::{Feature, FeatureSource, Properties};
use crate::store::{BlockAttrs, BuildingAttrs, GeoStoreBuilder};

/// Name given to ways whose source feature carries no usable name.
pub const UNNAMED: &str = "sin_nombre";

/// Candidate property keys and fallback key fragments for one logical field.
struct Field {
    keys: &'static [&'static str],
    terms: &'static [&'static str],
}

impl Field {
    fn pick(&self, props: &Properties) -> Option<String> { props.pick(self.keys, self.terms) }
}

const STREET_NAME: Field = Field { keys: &["CALLE", "NOM_CALLE", "NOMBRE", "NAME"], terms: &["calle", "nombre"] };
const AVENUE_NAME: Field = Field { keys: &["AVENIDA", "AVENIDAS", "NOMBRE", "NAME"], terms: &["avenid", "nombre"] };
const NEIGHBORHOOD: Field = Field { keys: &["BARRIO"], terms: &["barr"] };
const BLOCK_ID: Field = Field { keys: &["CHACRA", "CH", "NUM_CHACRA", "NUMCHACRA"], terms: &["chac"] };
const SUB_BLOCK_ID: Field = Field { keys: &["MANZANA", "MZ", "MZNA", "MANZ"], terms: &["manz", "mz"] };
const BUILDING_NUMBER: Field = Field { keys: &["NUMERO", "NRO", "NUM"], terms: &["num"] };
const UNIT_LETTER: Field = Field { keys: &["LETRA"], terms: &["letr"] };
const STAIRWELL: Field = Field { keys: &["ESCALERA", "ESC"], terms: &["escal"] };

static TRAILING_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\d+\s*\)\s*$").expect("valid regex"));
static WAY_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(avenida|av\.|calle|c\.)\s+").expect("valid regex"));

/// Clean a way name as published in the municipal layers:
/// `"AVENIDA ROQUE PEREZ(26)"` becomes `"Roque Perez"`.
pub fn clean_way_name(raw: &str) -> String {
    let without_code = TRAILING_CODE.replace(raw.trim(), "");
    let without_prefix = WAY_PREFIX.replace(without_code.trim(), "");
    title_case(without_prefix.trim())
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

impl GeoStoreBuilder {
    /// Read every feature of `source` as records of layer `kind`.
    /// Features whose geometry cannot represent the layer are skipped with a
    /// warning. Returns the number of records added.
    pub fn load_layer(&mut self, source: &dyn FeatureSource, kind: LayerKind) -> Result<usize, StoreError> {
        let features = source.features()?;
        let total = features.len();
        let mut added = 0;
        for (index, feature) in features.into_iter().enumerate() {
            let loaded = match kind {
                LayerKind::Street => self.load_street(&feature, StreetKind::Street, &STREET_NAME),
                LayerKind::Avenue => self.load_street(&feature, StreetKind::Avenue, &AVENUE_NAME),
                LayerKind::Block => self.load_block(&feature),
                LayerKind::Building => self.load_building(&feature),
            };
            if loaded { added += 1 } else { warn!(layer = kind.to_str(), index, "skipped feature without usable geometry") }
        }
        info!(layer = kind.to_str(), added, total, "loaded layer");
        Ok(added)
    }

    fn load_street(&mut self, feature: &Feature, kind: StreetKind, field: &Field) -> bool {
        let geometry = match &feature.geometry {
            Some(Geometry::LineString(ls)) => MultiLineString::new(vec![ls.clone()]),
            Some(Geometry::MultiLineString(mls)) => mls.clone(),
            _ => return false,
        };
        let name = match field.pick(&feature.properties).map(|raw| clean_way_name(&raw)) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warn!(keys = ?feature.properties.keys().take(15).collect::<Vec<_>>(), "way feature without name");
                UNNAMED.to_string()
            }
        };
        self.add_street(name, kind, feature.properties.list("aliases"), geometry);
        true
    }

    fn load_block(&mut self, feature: &Feature) -> bool {
        let geometry = match &feature.geometry {
            Some(Geometry::Polygon(poly)) => MultiPolygon::new(vec![poly.clone()]),
            Some(Geometry::MultiPolygon(mp)) => mp.clone(),
            _ => return false,
        };
        let props = &feature.properties;
        self.add_block(BlockAttrs {
            neighborhood: NEIGHBORHOOD.pick(props),
            // Chacra layers often carry no attributes at all; the feature id stands in.
            block_id: BLOCK_ID.pick(props).or_else(|| feature.id.clone()),
            sub_block_id: SUB_BLOCK_ID.pick(props),
        }, geometry);
        true
    }

    fn load_building(&mut self, feature: &Feature) -> bool {
        let Some(point) = feature.geometry.as_ref().and_then(building_point) else { return false };
        let props = &feature.properties;
        let attrs = BuildingAttrs {
            neighborhood: NEIGHBORHOOD.pick(props),
            block_id: BLOCK_ID.pick(props),
            sub_block_id: SUB_BLOCK_ID.pick(props),
            building_number: BUILDING_NUMBER.pick(props),
            unit_letter: UNIT_LETTER.pick(props),
            stairwell: STAIRWELL.pick(props),
        };
        if attrs.block_id.is_none() && attrs.sub_block_id.is_none() {
            warn!(keys = ?props.keys().take(20).collect::<Vec<_>>(), "building without chacra or manzana");
        }
        self.add_building(attrs, point);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GeoJsonSource;
    use crate::store::GeometryStore;

    #[test]
    fn cleans_published_way_names() {
        assert_eq!(clean_way_name("CALLE JUJUY(49)"), "Jujuy");
        assert_eq!(clean_way_name("AVENIDA ROQUE PEREZ (26) "), "Roque Perez");
        assert_eq!(clean_way_name("Av. mitre"), "Mitre");
        assert_eq!(clean_way_name("calle"), "Calle");
    }

    #[test]
    fn loads_streets_with_aliases_and_skips_points() {
        let src = GeoJsonSource::new(r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"AVENIDAS": "AVENIDA ROQUE PEREZ(26)", "aliases": ["Perez"]},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 0]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "MultiLineString", "coordinates": [[[0, 1], [1, 1]]]}},
            {"type": "Feature", "properties": {"AVENIDA": "X"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#);
        let mut builder = GeoStoreBuilder::new();
        assert_eq!(builder.load_layer(&src, LayerKind::Avenue).unwrap(), 2);
        let store = builder.build();
        assert_eq!(store.streets()[0].name, "Roque Perez");
        assert_eq!(store.streets()[0].kind, StreetKind::Avenue);
        assert_eq!(store.streets()[0].aliases, vec!["Perez"]);
        assert_eq!(store.streets()[1].name, UNNAMED);
    }

    #[test]
    fn block_without_attributes_uses_feature_id() {
        let src = GeoJsonSource::new(r#"{"type": "Feature", "id": "17", "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}"#);
        let mut builder = GeoStoreBuilder::new();
        builder.load_layer(&src, LayerKind::Block).unwrap();
        let store = builder.build();
        assert_eq!(store.blocks()[0].block_id.as_deref(), Some("17"));
        assert_eq!(store.find_block_by_block_id(17).len(), 1);
    }

    #[test]
    fn building_footprint_reduces_to_centroid() {
        let src = GeoJsonSource::new(r#"{"type": "Feature",
            "properties": {"Chacra": 32, "MZ": "B", "NRO": "12", "Letra": "A", "ESC": "2", "BARRIO": "Itaembe"},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}}"#);
        let mut builder = GeoStoreBuilder::new();
        builder.load_layer(&src, LayerKind::Building).unwrap();
        let store = builder.build();
        let b = &store.buildings()[0];
        assert_eq!(b.geometry, geo::Point::new(1.0, 1.0));
        assert_eq!(b.block_id.as_deref(), Some("32"));
        assert_eq!(b.sub_block_id.as_deref(), Some("B"));
        assert_eq!(b.building_number.as_deref(), Some("12"));
        assert_eq!(b.unit_letter.as_deref(), Some("A"));
        assert_eq!(b.stairwell.as_deref(), Some("2"));
        assert_eq!(b.neighborhood.as_deref(), Some("Itaembe"));
    }
}
