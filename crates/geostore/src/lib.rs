mod bbox;
pub mod error;
pub mod geom;
pub mod load;
pub mod manifest;
pub mod record;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod text;
pub mod trigram;

pub use error::StoreError;
pub use geom::{DistanceMetric, building_point, intersect, representative_point};
pub use load::{clean_way_name, UNNAMED};
pub use manifest::{LayerKind, LayerSpec, Manifest};
pub use record::{BlockRecord, BuildingId, BuildingRecord, GridId, StreetId, StreetKind, StreetRecord};
pub use snapshot::StoreHandle;
pub use source::{Feature, FeatureSource, GeoJsonSource, Properties};
pub use store::{BlockAttrs, BuildingAttrs, GeoStore, GeoStoreBuilder, GeometryStore, StreetHit};
pub use text::fold;
pub use trigram::{TrigramIndex, TrigramSet, similarity};
