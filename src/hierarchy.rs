use std::fmt;
use std::sync::LazyLock;

use geo::Centroid;
use geostore::{BlockRecord, BuildingRecord, GeometryStore};
use regex::Regex;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::result::{BuildingDetail, Outcome, ResolutionPayload, Status, ZoneDetail};

/// Words that mark an address as lying inside the chacra/monoblock grid.
pub static ZONE_KEYWORDS: &[&str] = &["chacra", "manzana", "monoblock", "edificio", "torre"];

const BLOCK_KEYWORD: &str = "chacra";
const BUILDING_KEYWORDS: &[&str] = &["monoblock", "edificio"];

static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Whether `text` mentions any zone keyword.
pub fn suggests_zone(text: &str) -> bool {
    ZONE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// A record found by the zone fallback.
#[derive(Debug, Clone, Copy)]
pub enum ZoneMatch<'a> {
    Block(&'a BlockRecord),
    Building(&'a BuildingRecord),
}

impl fmt::Display for ZoneMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneMatch::Block(block) => block.fmt(f),
            ZoneMatch::Building(building) => building.fmt(f),
        }
    }
}

/// Fallback search over the chacra grid and the building registry, keyed by
/// the first number in the address.
pub struct HierarchyResolver<'s, S: GeometryStore + ?Sized> {
    store: &'s S,
    config: &'s ResolverConfig,
}

impl<'s, S: GeometryStore + ?Sized> HierarchyResolver<'s, S> {
    pub fn new(store: &'s S, config: &'s ResolverConfig) -> Self {
        Self { store, config }
    }

    /// Records named by `text`: grid cells when it mentions a chacra,
    /// otherwise buildings when it mentions a monoblock or edificio.
    pub fn find(&self, text: &str) -> Vec<ZoneMatch<'s>> {
        let Some(number) = FIRST_INTEGER.find(text).and_then(|m| m.as_str().parse::<u64>().ok()) else {
            return Vec::new();
        };
        if text.contains(BLOCK_KEYWORD) {
            return self.store.find_block_by_block_id(number).into_iter().map(ZoneMatch::Block).collect();
        }
        if BUILDING_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
            return self.store.find_building_by_number(number).into_iter().map(ZoneMatch::Building).collect();
        }
        Vec::new()
    }

    /// Resolve `text` (normalized) against the zone stores. `None` when no
    /// record matched, leaving the current status untouched.
    pub fn resolve(&self, text: &str) -> Option<Outcome> {
        let matches = self.find(text);
        debug!(text, found = matches.len(), "zone fallback");
        match matches.as_slice() {
            [] => None,
            [ZoneMatch::Building(building)] => Some(Outcome::new(
                Status::Ok,
                ResolutionPayload::Building(BuildingDetail::from(*building)),
            )),
            [ZoneMatch::Block(block)] => Some(Outcome::new(
                Status::Incomplete,
                ResolutionPayload::Zone(ZoneDetail {
                    block: (*block).into(),
                    point: block.geometry.centroid().map(Into::into),
                }),
            ).with_prompt("¿Podés indicar la casa, torre o escalera?")),
            _ => Some(Outcome::new(
                Status::Ambiguous,
                ResolutionPayload::Ambiguous {
                    options: matches.iter().take(self.config.max_options).map(ToString::to_string).collect(),
                },
            ).with_prompt("¿Cuál de estas opciones es la correcta?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon, Point};
    use geostore::{BlockAttrs, BuildingAttrs, GeoStore, GeoStoreBuilder};

    use crate::result::Position;

    fn cell(x: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![(x: x, y: 0.0), (x: x + 2.0, y: 0.0), (x: x + 2.0, y: 2.0), (x: x, y: 2.0)]])
    }

    fn store() -> GeoStore {
        let mut builder = GeoStoreBuilder::new();
        builder.add_block(BlockAttrs { block_id: Some("5".into()), ..Default::default() }, cell(0.0));
        for (i, manzana) in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"].iter().enumerate() {
            builder.add_block(BlockAttrs {
                block_id: Some("32".into()),
                sub_block_id: Some(manzana.to_string()),
                ..Default::default()
            }, cell(10.0 + 3.0 * i as f64));
        }
        builder.add_building(BuildingAttrs {
            neighborhood: Some("Itaembe Mini".into()),
            block_id: Some("181".into()),
            sub_block_id: Some("3".into()),
            building_number: Some("12".into()),
            unit_letter: Some("B".into()),
            stairwell: Some("2".into()),
        }, Point::new(7.0, 8.0));
        builder.add_building(BuildingAttrs { building_number: Some("40".into()), ..Default::default() }, Point::new(1.0, 1.0));
        builder.add_building(BuildingAttrs { building_number: Some("40".into()), ..Default::default() }, Point::new(2.0, 2.0));
        builder.build()
    }

    fn resolve(store: &GeoStore, text: &str) -> Option<Outcome> {
        let config = ResolverConfig::default();
        HierarchyResolver::new(store, &config).resolve(text)
    }

    #[test]
    fn keywords_are_detected_as_substrings() {
        assert!(suggests_zone("torre 3 chacra 32"));
        assert!(suggests_zone("monoblock 4"));
        assert!(!suggests_zone("mitre 1200"));
    }

    #[test]
    fn single_building_is_ok_with_full_detail() {
        let outcome = resolve(&store(), "edificio 12").unwrap();
        assert_eq!(outcome.status, Status::Ok);
        let ResolutionPayload::Building(detail) = outcome.payload else { panic!("expected building") };
        assert_eq!(detail.neighborhood.as_deref(), Some("Itaembe Mini"));
        assert_eq!(detail.block_id.as_deref(), Some("181"));
        assert_eq!(detail.sub_block_id.as_deref(), Some("3"));
        assert_eq!(detail.building_number.as_deref(), Some("12"));
        assert_eq!(detail.unit_letter.as_deref(), Some("B"));
        assert_eq!(detail.stairwell.as_deref(), Some("2"));
        assert_eq!(detail.point, Position { x: 7.0, y: 8.0 });
    }

    #[test]
    fn single_block_is_incomplete_with_centroid() {
        let outcome = resolve(&store(), "chacra 5").unwrap();
        assert_eq!(outcome.status, Status::Incomplete);
        assert!(outcome.prompt.is_some());
        let ResolutionPayload::Zone(detail) = outcome.payload else { panic!("expected zone") };
        assert_eq!(detail.block.block_id.as_deref(), Some("5"));
        assert_eq!(detail.point, Some(Position { x: 1.0, y: 1.0 }));
    }

    #[test]
    fn many_blocks_are_ambiguous_and_capped() {
        let outcome = resolve(&store(), "chacra 32").unwrap();
        assert_eq!(outcome.status, Status::Ambiguous);
        let ResolutionPayload::Ambiguous { options } = outcome.payload else { panic!("expected options") };
        assert_eq!(options.len(), 8);
        assert_eq!(options[0], "Chacra 32, manzana a");
    }

    #[test]
    fn many_buildings_are_ambiguous() {
        let outcome = resolve(&store(), "monoblock 40").unwrap();
        assert_eq!(outcome.status, Status::Ambiguous);
        let ResolutionPayload::Ambiguous { options } = outcome.payload else { panic!("expected options") };
        assert_eq!(options, vec!["Edificio (chacra -, manzana -, nro 40)"; 2]);
    }

    #[test]
    fn chacra_takes_precedence_over_building_keywords() {
        let outcome = resolve(&store(), "edificio 5 chacra").unwrap();
        assert_eq!(outcome.status, Status::Incomplete);
        assert!(matches!(outcome.payload, ResolutionPayload::Zone(_)));
    }

    #[test]
    fn nothing_without_number_keyword_or_match() {
        assert_eq!(resolve(&store(), "edificio"), None);
        assert_eq!(resolve(&store(), "manzana 5"), None);
        assert_eq!(resolve(&store(), "torre 12"), None);
        assert_eq!(resolve(&store(), "edificio 99"), None);
    }
}
