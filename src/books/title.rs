/// Canonical lookup key for a book title.
///
/// Lower-cases, trims and drops every character outside `[a-z0-9]`, so titles
/// that differ only by case, spacing or punctuation share one key. The same
/// key is used by bulk load, insert, update and lookup.
pub fn normalize_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
