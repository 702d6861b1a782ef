use geostore::fold;

/// Abbreviations expanded when they open the address.
static ABBREVIATIONS: &[(&str, &str)] = &[
    ("av", "avenida"),
    ("av.", "avenida"),
    ("c", "calle"),
    ("c.", "calle"),
];

/// Canonical form of a free-text address: lower-case, without diacritics,
/// single-spaced, trimmed, with a leading way-type abbreviation expanded.
/// Only the first token is ever expanded. Idempotent.
pub fn normalize(text: &str) -> String {
    let folded = fold(text);
    let (first, rest) = match folded.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (folded.as_str(), None),
    };
    let Some((_, expanded)) = ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == first) else {
        return folded;
    };
    match rest {
        Some(rest) => format!("{expanded} {rest}"),
        None => expanded.to_string(),
    }
}
