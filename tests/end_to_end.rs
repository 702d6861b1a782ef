// Integration tests resolving free-text addresses against small in-memory stores.

use geo::{line_string, polygon, MultiLineString, MultiPolygon, Point};
use geostore::{BlockAttrs, BuildingAttrs, GeoStore, GeoStoreBuilder, StoreHandle, StreetKind};
use rayon::prelude::*;
use vadi::{MemoryAudit, ResolutionPayload, Resolver, ResolverConfig, Status};

fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiLineString<f64> {
    MultiLineString::new(vec![line_string![(x: x0, y: y0), (x: x1, y: y1)]])
}

fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![(x: x, y: y), (x: x + side, y: y), (x: x + side, y: y + side), (x: x, y: y + side)]])
}

/// Streets on a 1000-unit grid, with one chacra enclosing the Lavalle/Bustamante
/// corner and, optionally, a monoblock tower next to it.
fn builder(with_tower: bool) -> GeoStoreBuilder {
    let mut builder = GeoStoreBuilder::new();
    builder.add_street("Mitre", StreetKind::Avenue, vec!["Bartolomé Mitre".into()], line(0.0, 100.0, 1000.0, 100.0));
    builder.add_street("Lavalle", StreetKind::Street, vec![], line(0.0, 500.0, 1000.0, 500.0));
    builder.add_street("Bustamante", StreetKind::Street, vec![], line(500.0, 0.0, 500.0, 1000.0));
    builder.add_street("Colón", StreetKind::Street, vec![], line(0.0, 900.0, 1000.0, 900.0));

    builder.add_block(BlockAttrs {
        neighborhood: Some("Centro".into()),
        block_id: Some("32".into()),
        sub_block_id: Some("7".into()),
    }, square(400.0, 400.0, 200.0));
    builder.add_block(BlockAttrs { block_id: Some("181".into()), sub_block_id: Some("1".into()), ..Default::default() }, square(2000.0, 0.0, 100.0));
    builder.add_block(BlockAttrs { block_id: Some("181".into()), sub_block_id: Some("2".into()), ..Default::default() }, square(2100.0, 0.0, 100.0));

    builder.add_building(BuildingAttrs {
        neighborhood: Some("Itaembé Miní".into()),
        block_id: Some("181".into()),
        sub_block_id: Some("2".into()),
        building_number: Some("12".into()),
        unit_letter: Some("C".into()),
        stairwell: Some("1".into()),
    }, Point::new(2150.0, 50.0));
    if with_tower {
        builder.add_building(BuildingAttrs { building_number: Some("90".into()), ..Default::default() }, Point::new(560.0, 560.0));
    }
    builder
}

fn store() -> GeoStore {
    builder(false).build()
}

#[test]
fn street_with_height_is_interpolated() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("Av. Mitre 1234");

    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.input.parsed.way_type, Some(StreetKind::Avenue));
    assert_eq!(result.input.parsed.way_name, "mitre");
    let ResolutionPayload::Interpolated(detail) = &result.payload else { panic!("expected interpolated") };
    assert_eq!(detail.street.name, "Mitre");
    assert_eq!(detail.height, 1234);
    assert_eq!(detail.precision, "interpolated");
    assert!(result.street_id().is_some());
}

#[test]
fn street_without_height_is_incomplete() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("calle Lavalle");

    assert_eq!(result.status, Status::Incomplete);
    assert!(matches!(result.payload, ResolutionPayload::Street { .. }));
    assert!(result.prompt.unwrap().contains("altura"));
}

#[test]
fn nothing_recognisable_is_no_match() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("por favor ayuda");

    assert_eq!(result.status, Status::NoMatch);
    assert!(matches!(result.payload, ResolutionPayload::Suggestion { .. }));
    assert!(result.prompt.is_some());
}

#[test]
fn wrong_way_type_suggests_the_street() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("avenida lavalle");

    assert_eq!(result.status, Status::NoMatch);
    assert_eq!(result.payload, ResolutionPayload::Suggestion { suggestions: vec!["Calle Lavalle".to_string()] });
    assert!(result.prompt.is_some());
}

#[test]
fn single_building_query_is_ok() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("Edificio 12");

    assert_eq!(result.status, Status::Ok);
    let ResolutionPayload::Building(detail) = &result.payload else { panic!("expected building") };
    assert_eq!(detail.neighborhood.as_deref(), Some("Itaembé Miní"));
    assert_eq!(detail.block_id.as_deref(), Some("181"));
    assert_eq!(detail.sub_block_id.as_deref(), Some("2"));
    assert_eq!(detail.building_number.as_deref(), Some("12"));
    assert_eq!(detail.unit_letter.as_deref(), Some("C"));
    assert_eq!(detail.stairwell.as_deref(), Some("1"));
    assert_eq!((detail.point.x, detail.point.y), (2150.0, 50.0));
    assert_eq!(result.point(), Some(detail.point));
}

#[test]
fn repeated_chacra_is_ambiguous() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("Chacra 181");

    assert_eq!(result.status, Status::Ambiguous);
    let ResolutionPayload::Ambiguous { options } = &result.payload else { panic!("expected options") };
    assert_eq!(options, &vec!["Chacra 181, manzana 1".to_string(), "Chacra 181, manzana 2".to_string()]);
    assert!(options.len() <= config.max_options);
}

#[test]
fn ambiguous_options_are_capped() {
    let mut builder = GeoStoreBuilder::new();
    for i in 0..12 {
        builder.add_block(BlockAttrs { block_id: Some("5".into()), sub_block_id: Some(i.to_string()), ..Default::default() },
            square(10.0 * i as f64, 0.0, 5.0));
    }
    let store = builder.build();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("chacra 5");

    let ResolutionPayload::Ambiguous { options } = &result.payload else { panic!("expected options") };
    assert_eq!(options.len(), 8);
}

#[test]
fn corner_without_towers_is_ok() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("Lavalle y Bustamante");

    assert_eq!(result.status, Status::Ok);
    assert_eq!(result.input.parsed.way_name2.as_deref(), Some("bustamante"));
    let ResolutionPayload::Corner(detail) = &result.payload else { panic!("expected corner") };
    assert_eq!((detail.point.x, detail.point.y), (500.0, 500.0));
    let block = detail.block.as_ref().unwrap();
    assert_eq!(block.block_id.as_deref(), Some("32"));
    assert_eq!(block.sub_block_id.as_deref(), Some("7"));
    assert!(!detail.nearby_buildings);
}

#[test]
fn corner_next_to_tower_is_incomplete() {
    let store = builder(true).build();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("Lavalle y Bustamante");

    assert_eq!(result.status, Status::Incomplete);
    let ResolutionPayload::Corner(detail) = &result.payload else { panic!("expected corner") };
    assert!(detail.nearby_buildings);
    assert!(detail.block.is_some());
    assert!(result.prompt.is_some());
}

#[test]
fn parallel_ways_ask_for_confirmation() {
    let store = store();
    let config = ResolverConfig::default();
    let result = Resolver::new(&store, &config).resolve("lavalle y colon");

    assert_eq!(result.status, Status::Incomplete);
    let ResolutionPayload::CornerUnconfirmed { first, second } = &result.payload else { panic!("expected unconfirmed corner") };
    assert_eq!(first.as_ref().map(|s| s.name.as_str()), Some("Lavalle"));
    assert_eq!(second.as_ref().map(|s| s.name.as_str()), Some("Colón"));
}

#[test]
fn blank_input_is_the_only_error() {
    let store = store();
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&store, &config);
    assert_eq!(resolver.resolve("  ").status, Status::Error);
    for text in ["???", "1", "y", "av."] {
        assert_ne!(resolver.resolve(text).status, Status::Error, "{text}");
    }
}

#[test]
fn audit_records_every_resolution() {
    let store = store();
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&store, &config);
    let audit = MemoryAudit::new();
    resolver.resolve_and_record("Av. Mitre 1234", &audit);
    resolver.resolve_and_record("por favor ayuda", &audit);

    let entries = audit.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].raw, "Av. Mitre 1234");
    assert!(entries[0].street_id.is_some());
    assert_eq!(entries[1].status, Status::NoMatch);
}

#[test]
fn parallel_resolution_matches_sequential() {
    let handle = StoreHandle::new(store());
    let snapshot = handle.snapshot();
    let config = ResolverConfig::default();
    let resolver = Resolver::new(snapshot.as_ref(), &config);
    let inputs = ["Av. Mitre 1234", "Lavalle y Bustamante", "Edificio 12", "Chacra 181", "", "lavalle"];

    let sequential: Vec<_> = inputs.iter().map(|text| resolver.resolve(text)).collect();
    let parallel: Vec<_> = inputs.par_iter().map(|text| resolver.resolve(text)).collect();
    assert_eq!(sequential, parallel);

    handle.replace(GeoStore::default());
    assert_eq!(resolver.resolve("Av. Mitre 1234").status, Status::Ok);
    let fresh = handle.snapshot();
    assert_eq!(Resolver::new(fresh.as_ref(), &config).resolve("Av. Mitre 1234").status, Status::NoMatch);
}
