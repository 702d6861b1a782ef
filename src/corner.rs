use geostore::{intersect, representative_point, GeometryStore};
use tracing::debug;

use crate::config::ResolverConfig;
use crate::matcher::StreetMatcher;
use crate::parse::ParsedAddress;
use crate::result::{BlockSummary, CornerDetail, Outcome, ResolutionPayload, Status, StreetSummary};

const MONOBLOCK_PROMPT: &str = "Zona de monoblocks: indicá edificio o torre, escalera y departamento.";

/// Locates corner queries ("lavalle y bustamante") by intersecting the
/// geometries of the two best-matching ways.
pub struct CornerResolver<'s, S: GeometryStore + ?Sized> {
    store: &'s S,
    config: &'s ResolverConfig,
}

impl<'s, S: GeometryStore + ?Sized> CornerResolver<'s, S> {
    pub fn new(store: &'s S, config: &'s ResolverConfig) -> Self {
        Self { store, config }
    }

    /// Resolve a corner query. Returns `None` when neither way matches, so
    /// that the zone fallback can take over; any other outcome is final.
    pub fn resolve(&self, parsed: &ParsedAddress) -> Option<Outcome> {
        let second_name = parsed.way_name2.as_deref()?;
        let matcher = StreetMatcher::new(self.store, self.config);
        let first = matcher.best(&parsed.way_name, None).map(|c| c.record);
        let second = matcher.best(second_name, None).map(|c| c.record);

        let (a, b) = match (first, second) {
            (None, None) => {
                debug!(first = %parsed.way_name, second = second_name, "no way of the corner matched");
                return None;
            }
            (Some(a), Some(b)) => (a, b),
            _ => {
                let prompt = format!(
                    "¿Es la esquina entre {} y {}? ¿Tenés la altura?",
                    first.map_or(parsed.way_name.clone(), ToString::to_string),
                    second.map_or(second_name.to_string(), ToString::to_string),
                );
                return Some(Outcome::new(Status::Incomplete, ResolutionPayload::CornerUnconfirmed {
                    first: first.map(StreetSummary::from),
                    second: second.map(StreetSummary::from),
                }).with_prompt(prompt));
            }
        };

        // A way never forms a corner with itself.
        let crossing = if a.id == b.id { None } else { intersect(&a.geometry, &b.geometry) };
        let Some(point) = crossing.and_then(|g| representative_point(&g)) else {
            debug!(first = %a.name, second = %b.name, "ways do not intersect");
            return Some(Outcome::new(Status::Incomplete, ResolutionPayload::CornerUnconfirmed {
                first: Some(a.into()),
                second: Some(b.into()),
            }).with_prompt(format!("¿Es la esquina entre {a} y {b}? ¿Tenés la altura?")));
        };

        let block = self.store.find_block_containing(point);
        let nearby = !self.store
            .find_buildings_within_radius(point, self.config.nearby_radius, self.config.distance)
            .is_empty();
        debug!(first = %a.name, second = %b.name, x = point.x(), y = point.y(), nearby, "corner located");

        let outcome = Outcome::new(
            if nearby { Status::Incomplete } else { Status::Ok },
            ResolutionPayload::Corner(CornerDetail {
                first: a.into(),
                second: b.into(),
                point: point.into(),
                block: block.map(BlockSummary::from),
                nearby_buildings: nearby,
            }),
        );
        Some(if nearby { outcome.with_prompt(MONOBLOCK_PROMPT) } else { outcome })
    }
}
