use geostore::{fold, similarity, GeometryStore, StreetHit, StreetKind, StreetRecord};
use tracing::debug;

use crate::config::ResolverConfig;

/// A record matched by a lookup, with its score.
///
/// For streets the score is `name similarity + alias_weight * alias similarity`,
/// so it ranges over `[0, 1 + alias_weight]`; a score of exactly zero marks a
/// match found by the unranked substring fallback.
#[derive(Debug)]
pub struct MatchCandidate<'a, R> {
    pub record: &'a R,
    /// Raw score, not normalized to `[0, 1]`; see [`MatchCandidate::confidence`].
    pub score: f64,
}

impl<R> Clone for MatchCandidate<'_, R> {
    fn clone(&self) -> Self { *self }
}

impl<R> Copy for MatchCandidate<'_, R> {}

impl<R> MatchCandidate<'_, R> {
    /// Whether this candidate was ranked by similarity rather than found by substring.
    #[inline] pub fn is_ranked(&self) -> bool { self.score > 0.0 }

    /// Score rescaled to `[0, 1]` given the alias weight it was computed with.
    #[inline]
    pub fn confidence(&self, alias_weight: f64) -> f64 {
        (self.score / (1.0 + alias_weight)).clamp(0.0, 1.0)
    }
}

/// Street score of `name` against `record`, computed directly from the strings.
pub fn street_score(name: &str, record: &StreetRecord, alias_weight: f64) -> f64 {
    let name = fold(name);
    similarity(&name, &fold(&record.name)) + alias_weight * similarity(&name, &fold(&record.joined_aliases()))
}

/// Two-tier street lookup: trigram-ranked candidates above the threshold,
/// or, when none qualify, a plain substring search.
pub struct StreetMatcher<'s, S: GeometryStore + ?Sized> {
    store: &'s S,
    config: &'s ResolverConfig,
}

impl<'s, S: GeometryStore + ?Sized> StreetMatcher<'s, S> {
    pub fn new(store: &'s S, config: &'s ResolverConfig) -> Self {
        Self { store, config }
    }

    #[inline]
    fn score(&self, hit: &StreetHit<'_>) -> f64 {
        hit.name_similarity + self.config.alias_weight * hit.alias_similarity
    }

    /// At most `max_candidates` streets matching `name`, best first.
    /// An empty name matches nothing.
    pub fn find_street(&self, name: &str, kind: Option<StreetKind>) -> Vec<MatchCandidate<'s, StreetRecord>> {
        if name.trim().is_empty() { return Vec::new() }

        let mut ranked: Vec<MatchCandidate<'s, StreetRecord>> = self.store.find_streets_by_name_fuzzy(name, kind)
            .iter()
            .map(|hit| MatchCandidate { record: hit.record, score: self.score(hit) })
            .filter(|c| c.score.is_finite() && c.score > self.config.fuzzy_threshold)
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.config.max_candidates);

        if !ranked.is_empty() {
            debug!(name, best = %ranked[0].record.name, score = ranked[0].score, "ranked street match");
            return ranked;
        }

        let loose: Vec<MatchCandidate<'s, StreetRecord>> = self.store
            .find_streets_by_name_substring(name, kind, self.config.max_candidates)
            .into_iter()
            .map(|record| MatchCandidate { record, score: 0.0 })
            .collect();
        debug!(name, found = loose.len(), "substring street fallback");
        loose
    }

    /// The best street for `name`, if any.
    #[inline]
    pub fn best(&self, name: &str, kind: Option<StreetKind>) -> Option<MatchCandidate<'s, StreetRecord>> {
        self.find_street(name, kind).into_iter().next()
    }

    /// Display names of streets loosely containing `name`, for no-match prompts.
    pub fn suggestions(&self, name: &str) -> Vec<String> {
        if name.trim().is_empty() { return Vec::new() }
        self.store.find_streets_by_name_substring(name, None, self.config.max_suggestions)
            .into_iter()
            .map(|street| street.to_string())
            .collect()
    }
}
