use std::fmt;

use geo::{MultiLineString, MultiPolygon, Point};
use serde::{Deserialize, Serialize};

/// Index of a `StreetRecord` within a `GeoStore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreetId(pub u32);

/// Index of a `BlockRecord` (one cell of the chacra/manzana grid) within a `GeoStore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId(pub u32);

/// Index of a `BuildingRecord` within a `GeoStore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Kind of way in the street gazetteer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetKind {
    Street,
    Avenue,
}

impl StreetKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            StreetKind::Street => "street",
            StreetKind::Avenue => "avenue",
        }
    }

    /// Local word used as a prefix in free-text addresses ("calle", "avenida").
    pub fn prefix(&self) -> &'static str {
        match self {
            StreetKind::Street => "calle",
            StreetKind::Avenue => "avenida",
        }
    }
}

impl fmt::Display for StreetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A named way (street or avenue) of the gazetteer.
#[derive(Debug, Clone)]
pub struct StreetRecord {
    pub id: StreetId,
    pub name: String,
    pub kind: StreetKind,
    pub aliases: Vec<String>, // Ordered, deduplicated
    pub geometry: MultiLineString<f64>,
}

impl StreetRecord {
    /// Aliases joined into one string, in order, separated by `", "`.
    #[inline] pub fn joined_aliases(&self) -> String { self.aliases.join(", ") }
}

impl fmt::Display for StreetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StreetKind::Street => write!(f, "Calle {}", self.name),
            StreetKind::Avenue => write!(f, "Avenida {}", self.name),
        }
    }
}

/// One cell of the rural-block grid: a chacra, or a manzana within a chacra.
#[derive(Debug, Clone)]
pub struct BlockRecord {
    pub id: GridId,
    pub neighborhood: Option<String>,
    pub block_id: Option<String>,     // chacra
    pub sub_block_id: Option<String>, // manzana
    pub geometry: MultiPolygon<f64>,
}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chacra {}, manzana {}",
            self.block_id.as_deref().unwrap_or("-"),
            self.sub_block_id.as_deref().unwrap_or("-"))
    }
}

/// A residential building or monoblock tower, reduced to a single point.
#[derive(Debug, Clone)]
pub struct BuildingRecord {
    pub id: BuildingId,
    pub neighborhood: Option<String>,
    pub block_id: Option<String>,
    pub sub_block_id: Option<String>,
    pub building_number: Option<String>,
    pub unit_letter: Option<String>,
    pub stairwell: Option<String>,
    pub geometry: Point<f64>,
}

impl fmt::Display for BuildingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edificio (chacra {}, manzana {}, nro {})",
            self.block_id.as_deref().unwrap_or("-"),
            self.sub_block_id.as_deref().unwrap_or("-"),
            self.building_number.as_deref().unwrap_or("-"))
    }
}
