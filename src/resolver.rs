use geostore::{GeometryStore, StreetRecord};
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditSink};
use crate::config::ResolverConfig;
use crate::corner::CornerResolver;
use crate::hierarchy::{suggests_zone, HierarchyResolver};
use crate::matcher::StreetMatcher;
use crate::normalize::normalize;
use crate::parse::{parse, ParsedAddress};
use crate::result::{
    InterpolatedDetail, Outcome, ResolutionPayload, ResolutionResult, ResolvedInput, Status,
};

/// Precision label of a street plus height. Heights are never checked
/// against a numbering range.
pub const INTERPOLATED: &str = "interpolated";

const EMPTY_INPUT: &str = "La dirección está vacía.";
const EMPTY_PROMPT: &str = "Ingresá una dirección.";
const HEIGHT_PROMPT: &str = "¿Tenés la altura o una esquina cercana?";
const NO_MATCH_PROMPT: &str =
    "No encontramos la dirección. Indicá altura o esquina; si es un barrio con chacras o manzanas, indicá edificio o torre.";

/// Turns free-text addresses into classified results over one store snapshot.
///
/// Stages run in a fixed order and the first final outcome wins:
/// 1. empty input is an error;
/// 2. corner queries go to [`CornerResolver`], whose outcome is final unless
///    neither way matched;
/// 3. otherwise the best street (filtered by way type) gives an interpolated
///    or height-less street result;
/// 4. with no street candidate, the zone fallback searches the chacra grid
///    and the building registry;
/// 5. anything still unmatched is `NO_MATCH` with street suggestions.
pub struct Resolver<'s, S: GeometryStore + ?Sized> {
    store: &'s S,
    config: &'s ResolverConfig,
}

impl<'s, S: GeometryStore + ?Sized> Resolver<'s, S> {
    pub fn new(store: &'s S, config: &'s ResolverConfig) -> Self {
        Self { store, config }
    }

    /// Resolve `text`. Never fails: `ERROR` is reserved for empty input.
    pub fn resolve(&self, text: &str) -> ResolutionResult {
        if text.trim().is_empty() {
            debug!("empty input");
            return ResolutionResult {
                status: Status::Error,
                payload: ResolutionPayload::Error { message: EMPTY_INPUT.to_string() },
                prompt: Some(EMPTY_PROMPT.to_string()),
                input: ResolvedInput { raw: text.to_string(), normalized: String::new(), parsed: ParsedAddress::default() },
            };
        }

        let normalized = normalize(text);
        let parsed = parse(&normalized);
        debug!(%normalized, ?parsed, "parsed input");

        let outcome = self.classify(&normalized, &parsed);
        debug!(status = %outcome.status, "resolved");
        ResolutionResult {
            status: outcome.status,
            payload: outcome.payload,
            prompt: outcome.prompt,
            input: ResolvedInput { raw: text.to_string(), normalized, parsed },
        }
    }

    /// Resolve `text` and hand the result to `sink`. A failed write is
    /// logged and does not alter the result.
    pub fn resolve_and_record(&self, text: &str, sink: &dyn AuditSink) -> ResolutionResult {
        let result = self.resolve(text);
        if let Err(err) = sink.record(&AuditEntry::new(&result)) {
            warn!(error = %err, raw = text, "failed to record audit entry");
        }
        result
    }

    fn classify(&self, normalized: &str, parsed: &ParsedAddress) -> Outcome {
        let matcher = StreetMatcher::new(self.store, self.config);

        if parsed.is_corner() {
            if let Some(outcome) = CornerResolver::new(self.store, self.config).resolve(parsed) {
                return outcome;
            }
        } else if let Some(candidate) = matcher.best(&parsed.way_name, parsed.way_type) {
            // A street candidate is final: the zone fallback never downgrades it.
            return self.street_outcome(candidate.record, parsed.height);
        }

        debug!(%normalized, zone_keywords = suggests_zone(normalized), "no street candidate");
        if let Some(outcome) = HierarchyResolver::new(self.store, self.config).resolve(normalized) {
            return outcome;
        }

        let suggestions = matcher.suggestions(&parsed.way_name);
        debug!(way_name = %parsed.way_name, suggestions = suggestions.len(), "no match");
        Outcome::new(Status::NoMatch, ResolutionPayload::Suggestion { suggestions }).with_prompt(NO_MATCH_PROMPT)
    }

    fn street_outcome(&self, street: &StreetRecord, height: Option<u32>) -> Outcome {
        match height {
            Some(height) => Outcome::new(
                Status::Ok,
                ResolutionPayload::Interpolated(InterpolatedDetail {
                    street: street.into(),
                    height,
                    precision: INTERPOLATED.to_string(),
                }),
            ),
            None => Outcome::new(Status::Incomplete, ResolutionPayload::Street { street: street.into() })
                .with_prompt(HEIGHT_PROMPT),
        }
    }
}
