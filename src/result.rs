use std::fmt;

use geo::Point;
use geostore::{BlockRecord, BuildingId, BuildingRecord, StreetId, StreetKind, StreetRecord};
use serde::{Deserialize, Serialize};

use crate::parse::ParsedAddress;

/// Confidence state of a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Incomplete,
    Ambiguous,
    NoMatch,
    Error,
}

impl Status {
    pub fn to_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Incomplete => "INCOMPLETE",
            Status::Ambiguous => "AMBIGUOUS",
            Status::NoMatch => "NO_MATCH",
            Status::Error => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A coordinate pair in the stores' reference system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl From<Point<f64>> for Position {
    fn from(point: Point<f64>) -> Self { Self { x: point.x(), y: point.y() } }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreetSummary {
    pub id: StreetId,
    pub name: String,
    pub kind: StreetKind,
}

impl From<&StreetRecord> for StreetSummary {
    fn from(street: &StreetRecord) -> Self {
        Self { id: street.id, name: street.name.clone(), kind: street.kind }
    }
}

/// Chacra and manzana identifiers of a grid cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub block_id: Option<String>,
    pub sub_block_id: Option<String>,
}

impl From<&BlockRecord> for BlockSummary {
    fn from(block: &BlockRecord) -> Self {
        Self { block_id: block.block_id.clone(), sub_block_id: block.sub_block_id.clone() }
    }
}

/// A way matched together with the height given by the user. The height is
/// never checked against a numbering range: none exists for this grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedDetail {
    pub street: StreetSummary,
    pub height: u32,
    pub precision: String,
}

/// Geometric corner of two matched ways.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerDetail {
    pub first: StreetSummary,
    pub second: StreetSummary,
    pub point: Position,
    pub block: Option<BlockSummary>,
    pub nearby_buildings: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingDetail {
    pub id: BuildingId,
    pub neighborhood: Option<String>,
    pub block_id: Option<String>,
    pub sub_block_id: Option<String>,
    pub building_number: Option<String>,
    pub unit_letter: Option<String>,
    pub stairwell: Option<String>,
    pub point: Position,
}

impl From<&BuildingRecord> for BuildingDetail {
    fn from(b: &BuildingRecord) -> Self {
        Self {
            id: b.id,
            neighborhood: b.neighborhood.clone(),
            block_id: b.block_id.clone(),
            sub_block_id: b.sub_block_id.clone(),
            building_number: b.building_number.clone(),
            unit_letter: b.unit_letter.clone(),
            stairwell: b.stairwell.clone(),
            point: b.geometry.into(),
        }
    }
}

/// A grid cell matched by its chacra number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneDetail {
    pub block: BlockSummary,
    pub point: Option<Position>,
}

/// What a resolution found; every status maps to a fixed set of variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionPayload {
    /// OK: way plus height.
    Interpolated(InterpolatedDetail),
    /// INCOMPLETE: way without height.
    Street { street: StreetSummary },
    /// OK or INCOMPLETE: computed corner point.
    Corner(CornerDetail),
    /// INCOMPLETE: corner named but not located.
    CornerUnconfirmed { first: Option<StreetSummary>, second: Option<StreetSummary> },
    /// OK: a single building.
    Building(BuildingDetail),
    /// INCOMPLETE: a single grid cell.
    Zone(ZoneDetail),
    /// AMBIGUOUS: several zone records.
    Ambiguous { options: Vec<String> },
    /// NO_MATCH: loosely matching street names, possibly none.
    Suggestion { suggestions: Vec<String> },
    /// ERROR.
    Error { message: String },
}

/// Status, payload and prompt produced by one resolution stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub status: Status,
    pub payload: ResolutionPayload,
    pub prompt: Option<String>,
}

impl Outcome {
    pub fn new(status: Status, payload: ResolutionPayload) -> Self {
        Self { status, payload, prompt: None }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// Echo of what the resolver read from the input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInput {
    pub raw: String,
    pub normalized: String,
    pub parsed: ParsedAddress,
}

/// Terminal outcome of one resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub status: Status,
    pub payload: ResolutionPayload,
    /// Follow-up question for the user, when more detail would help.
    pub prompt: Option<String>,
    pub input: ResolvedInput,
}

impl ResolutionResult {
    /// The street the result is anchored on, if any.
    pub fn street_id(&self) -> Option<StreetId> {
        match &self.payload {
            ResolutionPayload::Interpolated(detail) => Some(detail.street.id),
            ResolutionPayload::Street { street } => Some(street.id),
            ResolutionPayload::Corner(detail) => Some(detail.first.id),
            _ => None,
        }
    }

    pub fn building_id(&self) -> Option<BuildingId> {
        match &self.payload {
            ResolutionPayload::Building(detail) => Some(detail.id),
            _ => None,
        }
    }

    /// The geographic point the result resolved to, if any.
    pub fn point(&self) -> Option<Position> {
        match &self.payload {
            ResolutionPayload::Corner(detail) => Some(detail.point),
            ResolutionPayload::Building(detail) => Some(detail.point),
            ResolutionPayload::Zone(detail) => detail.point,
            _ => None,
        }
    }
}
