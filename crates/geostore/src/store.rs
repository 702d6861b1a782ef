use ahash::AHashMap;
use geo::{Area, BoundingRect, Contains, MultiLineString, MultiPolygon, Point};
use rstar::{primitives::GeomWithData, RTree, AABB};
use tracing::{debug, info};

use crate::bbox::ArenaExtent;
use crate::geom::DistanceMetric;
use crate::record::{BlockRecord, BuildingId, BuildingRecord, GridId, StreetId, StreetKind, StreetRecord};
use crate::text::{fold, numeric_key};
use crate::trigram::TrigramIndex;

/// A street returned by the fuzzy text search, with its raw trigram
/// similarities against the record's name and against its joined aliases.
#[derive(Debug, Clone, Copy)]
pub struct StreetHit<'a> {
    pub record: &'a StreetRecord,
    pub name_similarity: f64,
    pub alias_similarity: f64,
}

/// Read-only lookups the resolver needs from the geographic stores.
/// Implementations must be safe to query from many threads at once.
pub trait GeometryStore: Send + Sync {
    /// Every street of `kind` (any kind if `None`) sharing at least one
    /// trigram with `name`, in store order.
    fn find_streets_by_name_fuzzy(&self, name: &str, kind: Option<StreetKind>) -> Vec<StreetHit<'_>>;

    /// Up to `limit` streets whose folded name contains the folded `name`, in store order.
    fn find_streets_by_name_substring(&self, name: &str, kind: Option<StreetKind>, limit: usize) -> Vec<&StreetRecord>;

    /// The most specific (smallest) grid cell containing `point`, if any.
    fn find_block_containing(&self, point: Point<f64>) -> Option<&BlockRecord>;

    /// Buildings within `radius` of `point`, nearest first.
    fn find_buildings_within_radius(&self, point: Point<f64>, radius: f64, metric: DistanceMetric) -> Vec<&BuildingRecord>;

    /// Grid cells whose chacra identifier equals `block_id`.
    fn find_block_by_block_id(&self, block_id: u64) -> Vec<&BlockRecord>;

    /// Buildings whose number equals `number`.
    fn find_building_by_number(&self, number: u64) -> Vec<&BuildingRecord>;
}

/// Descriptive attributes of a grid cell.
#[derive(Debug, Clone, Default)]
pub struct BlockAttrs {
    pub neighborhood: Option<String>,
    pub block_id: Option<String>,
    pub sub_block_id: Option<String>,
}

/// Descriptive attributes of a building.
#[derive(Debug, Clone, Default)]
pub struct BuildingAttrs {
    pub neighborhood: Option<String>,
    pub block_id: Option<String>,
    pub sub_block_id: Option<String>,
    pub building_number: Option<String>,
    pub unit_letter: Option<String>,
    pub stairwell: Option<String>,
}

/// Accumulates records; `build` freezes them into an indexed `GeoStore`.
#[derive(Debug, Default)]
pub struct GeoStoreBuilder {
    streets: Vec<StreetRecord>,
    blocks: Vec<BlockRecord>,
    buildings: Vec<BuildingRecord>,
}

impl GeoStoreBuilder {
    pub fn new() -> Self { Self::default() }

    /// Add a street; duplicate aliases are dropped, keeping first occurrences.
    pub fn add_street(&mut self, name: impl Into<String>, kind: StreetKind, aliases: Vec<String>, geometry: MultiLineString<f64>) -> StreetId {
        let id = StreetId(self.streets.len() as u32);
        let mut unique: Vec<String> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            if !alias.trim().is_empty() && !unique.contains(&alias) { unique.push(alias) }
        }
        self.streets.push(StreetRecord { id, name: name.into(), kind, aliases: unique, geometry });
        id
    }

    pub fn add_block(&mut self, attrs: BlockAttrs, geometry: MultiPolygon<f64>) -> GridId {
        let id = GridId(self.blocks.len() as u32);
        self.blocks.push(BlockRecord {
            id,
            neighborhood: attrs.neighborhood,
            block_id: attrs.block_id,
            sub_block_id: attrs.sub_block_id,
            geometry,
        });
        id
    }

    pub fn add_building(&mut self, attrs: BuildingAttrs, geometry: Point<f64>) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        self.buildings.push(BuildingRecord {
            id,
            neighborhood: attrs.neighborhood,
            block_id: attrs.block_id,
            sub_block_id: attrs.sub_block_id,
            building_number: attrs.building_number,
            unit_letter: attrs.unit_letter,
            stairwell: attrs.stairwell,
            geometry,
        });
        id
    }

    /// Build every text and spatial index and freeze the store.
    pub fn build(self) -> GeoStore {
        let folded_names: Vec<String> = self.streets.iter().map(|s| fold(&s.name)).collect();
        let folded_aliases: Vec<String> = self.streets.iter().map(|s| fold(&s.joined_aliases())).collect();
        let text = TrigramIndex::new(
            folded_names.iter().map(String::as_str).zip(folded_aliases.iter().map(String::as_str))
        );

        let block_rtree = RTree::bulk_load(
            self.blocks.iter().enumerate()
                .filter_map(|(i, block)| block.geometry.bounding_rect().map(|rect| ArenaExtent::new(i, rect)))
                .collect()
        );
        let building_rtree = RTree::bulk_load(
            self.buildings.iter().enumerate()
                .map(|(i, b)| GeomWithData::new([b.geometry.x(), b.geometry.y()], i as u32))
                .collect()
        );

        let block_by_id = group_by_key(self.blocks.iter().map(|b| b.block_id.as_deref()));
        let building_by_number = group_by_key(self.buildings.iter().map(|b| b.building_number.as_deref()));

        info!(
            streets = self.streets.len(),
            blocks = self.blocks.len(),
            buildings = self.buildings.len(),
            "built geometry store"
        );

        GeoStore {
            streets: self.streets,
            folded_names,
            text,
            blocks: self.blocks,
            block_rtree,
            block_by_id,
            buildings: self.buildings,
            building_rtree,
            building_by_number,
        }
    }
}

/// Map numeric identifiers to the arena indices carrying them.
fn group_by_key<'a>(keys: impl Iterator<Item = Option<&'a str>>) -> AHashMap<u64, Vec<u32>> {
    let mut map: AHashMap<u64, Vec<u32>> = AHashMap::new();
    for (i, key) in keys.enumerate() {
        if let Some(key) = key.and_then(numeric_key) {
            map.entry(key).or_default().push(i as u32);
        }
    }
    map
}

/// An immutable generation of the street gazetteer, block grid and building
/// stores, with a trigram index over street names and R-trees over blocks
/// and buildings.
#[derive(Debug)]
pub struct GeoStore {
    streets: Vec<StreetRecord>,
    folded_names: Vec<String>, // Parallel to streets
    text: TrigramIndex,
    blocks: Vec<BlockRecord>,
    block_rtree: RTree<ArenaExtent>,
    block_by_id: AHashMap<u64, Vec<u32>>,
    buildings: Vec<BuildingRecord>,
    building_rtree: RTree<GeomWithData<[f64; 2], u32>>,
    building_by_number: AHashMap<u64, Vec<u32>>,
}

impl Default for GeoStore {
    fn default() -> Self { GeoStoreBuilder::new().build() }
}

impl GeoStore {
    #[inline] pub fn streets(&self) -> &[StreetRecord] { &self.streets }

    #[inline] pub fn blocks(&self) -> &[BlockRecord] { &self.blocks }

    #[inline] pub fn buildings(&self) -> &[BuildingRecord] { &self.buildings }
}

impl GeometryStore for GeoStore {
    fn find_streets_by_name_fuzzy(&self, name: &str, kind: Option<StreetKind>) -> Vec<StreetHit<'_>> {
        let hits: Vec<StreetHit<'_>> = self.text.search(&fold(name)).into_iter()
            .map(|(doc, name_similarity, alias_similarity)| StreetHit {
                record: &self.streets[doc as usize],
                name_similarity,
                alias_similarity,
            })
            .filter(|hit| kind.is_none_or(|k| hit.record.kind == k))
            .collect();
        debug!(query = name, hits = hits.len(), "fuzzy street lookup");
        hits
    }

    fn find_streets_by_name_substring(&self, name: &str, kind: Option<StreetKind>, limit: usize) -> Vec<&StreetRecord> {
        let needle = fold(name);
        self.streets.iter().zip(self.folded_names.iter())
            .filter(|(street, _)| kind.is_none_or(|k| street.kind == k))
            .filter(|(_, folded)| folded.contains(&needle))
            .map(|(street, _)| street)
            .take(limit)
            .collect()
    }

    fn find_block_containing(&self, point: Point<f64>) -> Option<&BlockRecord> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        self.block_rtree.locate_in_envelope_intersecting(&envelope)
            .map(|extent| &self.blocks[extent.slot()])
            .filter(|block| block.geometry.contains(&point))
            .min_by(|a, b| a.geometry.unsigned_area().total_cmp(&b.geometry.unsigned_area()))
    }

    fn find_buildings_within_radius(&self, point: Point<f64>, radius: f64, metric: DistanceMetric) -> Vec<&BuildingRecord> {
        let envelope = metric.envelope(point, radius);
        let mut found: Vec<(f64, &BuildingRecord)> = self.building_rtree.locate_in_envelope(&envelope)
            .map(|entry| &self.buildings[entry.data as usize])
            .map(|building| (metric.distance(point, building.geometry), building))
            .filter(|(distance, _)| *distance <= radius)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.into_iter().map(|(_, building)| building).collect()
    }

    fn find_block_by_block_id(&self, block_id: u64) -> Vec<&BlockRecord> {
        self.block_by_id.get(&block_id)
            .map(|ids| ids.iter().map(|&i| &self.blocks[i as usize]).collect())
            .unwrap_or_default()
    }

    fn find_building_by_number(&self, number: u64) -> Vec<&BuildingRecord> {
        self.building_by_number.get(&number)
            .map(|ids| ids.iter().map(|&i| &self.buildings[i as usize]).collect())
            .unwrap_or_default()
    }
}
