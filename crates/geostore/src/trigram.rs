use ahash::{AHashMap, AHashSet};

/// A single 3-character shingle.
pub type Trigram = [char; 3];

/// The distinct trigrams of a string.
///
/// Follows the `pg_trgm` convention: the text is lower-cased and split into
/// words at every non-alphanumeric character; each word is padded with two
/// leading blanks and one trailing blank before shingling, so that short
/// words and word starts still contribute trigrams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrigramSet(AHashSet<Trigram>);

impl TrigramSet {
    pub fn new(text: &str) -> Self {
        let mut set = AHashSet::new();
        let lower = text.to_lowercase();
        for word in lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let padded: Vec<char> = [' ', ' '].into_iter()
                .chain(word.chars())
                .chain(std::iter::once(' '))
                .collect();
            for window in padded.windows(3) {
                set.insert([window[0], window[1], window[2]]);
            }
        }
        Self(set)
    }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Trigram> { self.0.iter() }

    /// Shared-over-total ratio |A∩B| / |A∪B| of the two trigram sets, in [0, 1].
    pub fn similarity(&self, other: &TrigramSet) -> f64 {
        if self.is_empty() || other.is_empty() { return 0.0 }
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        let shared = small.0.iter().filter(|t| large.0.contains(*t)).count();
        let union = self.len() + other.len() - shared;
        shared as f64 / union as f64
    }
}

/// Trigram similarity of two strings (see `TrigramSet`).
pub fn similarity(a: &str, b: &str) -> f64 {
    TrigramSet::new(a).similarity(&TrigramSet::new(b))
}

/// Inverted trigram index over a set of documents, each with a primary text
/// and a secondary text (a street's name and its joined aliases).
#[derive(Debug, Default)]
pub struct TrigramIndex {
    primary: Vec<TrigramSet>,
    secondary: Vec<TrigramSet>,
    postings: AHashMap<Trigram, Vec<u32>>,
}

impl TrigramIndex {
    /// Build the index; `docs` yields `(primary, secondary)` in document order.
    pub fn new<'a>(docs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut index = Self::default();
        for (doc, (primary, secondary)) in docs.into_iter().enumerate() {
            let primary = TrigramSet::new(primary);
            let secondary = TrigramSet::new(secondary);
            let mut seen: AHashSet<Trigram> = AHashSet::new();
            for trigram in primary.iter().chain(secondary.iter()) {
                if seen.insert(*trigram) {
                    index.postings.entry(*trigram).or_default().push(doc as u32);
                }
            }
            index.primary.push(primary);
            index.secondary.push(secondary);
        }
        index
    }

    /// Every document sharing at least one trigram with `query`, as
    /// `(doc, primary similarity, secondary similarity)`, in document order.
    /// Documents sharing no trigram have zero similarity on both texts and
    /// are never returned.
    pub fn search(&self, query: &str) -> Vec<(u32, f64, f64)> {
        let query = TrigramSet::new(query);
        let mut docs: Vec<u32> = query.iter()
            .filter_map(|t| self.postings.get(t))
            .flatten()
            .copied()
            .collect();
        docs.sort_unstable();
        docs.dedup();

        docs.into_iter()
            .map(|doc| (
                doc,
                query.similarity(&self.primary[doc as usize]),
                query.similarity(&self.secondary[doc as usize]),
            ))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_trigrams_of_short_word() {
        // "  ab " -> "  a", " ab", "ab "
        let set = TrigramSet::new("ab");
        assert_eq!(set.len(), 3);
        assert!(set.0.contains(&[' ', ' ', 'a']));
        assert!(set.0.contains(&[' ', 'a', 'b']));
        assert!(set.0.contains(&['a', 'b', ' ']));
    }

    #[test]
    fn punctuation_splits_words() {
        assert_eq!(TrigramSet::new("gral. paz"), TrigramSet::new("gral paz"));
    }

    #[test]
    fn identical_strings_have_similarity_one() {
        assert_eq!(similarity("bustamante", "bustamante"), 1.0);
    }

    #[test]
    fn disjoint_strings_have_similarity_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "xyz"), 0.0);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded() {
        let (a, b) = ("lavalle", "lavale");
        let s = similarity(a, b);
        assert_eq!(s, similarity(b, a));
        assert!(s > 0.0 && s < 1.0);
    }

    #[test]
    fn index_returns_only_overlapping_documents() {
        let index = TrigramIndex::new([("Mitre", ""), ("Lavalle", "Gral Lavalle"), ("Zapiola", "")]);
        let hits = index.search("lavalle");
        assert_eq!(hits.len(), 1);
        let (doc, primary, secondary) = hits[0];
        assert_eq!(doc, 1);
        assert_eq!(primary, 1.0);
        assert!(secondary > 0.0 && secondary < 1.0);
    }
}
