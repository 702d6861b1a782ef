use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Fold text for comparison: lower-case, strip combining diacritical marks
/// (after canonical decomposition), collapse whitespace runs and trim.
///
/// `fold("  Avenida  Bustamánte ")` is `"avenida bustamante"`.
pub fn fold(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an identifier such as `"012"` or `" 7 "` into its integer value.
/// Returns `None` when the text is not a plain non-negative integer.
pub fn numeric_key(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
