/*!
 * Heading anchors compatible with the documentation builder.
 *
 * An anchor is `[[slug]]` where the slug is derived from the source-language
 * heading title. Anchors are paired with translated headings by position only.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::sections::Segmentation;

/// Whitespace runs that collapse to a single space
static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s{2,}").expect("Invalid whitespace regex")
});

/// Derive the slug for a heading title.
///
/// Lowercase, drop everything except ASCII lowercase letters, digits and
/// whitespace, trim, collapse whitespace runs, then join words with hyphens.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    WHITESPACE_RUN_REGEX
        .replace_all(kept.trim(), " ")
        .replace(' ', "-")
}

/// Derive the `[[slug]]` anchor for a heading title
pub fn derive_anchor(title: &str) -> String {
    format!("[[{}]]", slugify(title))
}

/// Anchors for every heading of a source segmentation, in order
pub fn anchors_for(segmentation: &Segmentation) -> Vec<String> {
    segmentation.titles().map(derive_anchor).collect()
}

/// Difference between source and translated heading counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrift {
    /// Headings in the source prose
    pub expected: usize,
    /// Headings in the translated prose
    pub found: usize,
}

/// Pair source anchors with translated headings by index.
///
/// Extra anchors are dropped and missing ones are padded with empty strings
/// so the result always has exactly `translated_count` entries.
pub fn align_anchors(
    anchors: &[String],
    translated_count: usize,
) -> (Vec<String>, Option<HeaderDrift>) {
    let drift = (anchors.len() != translated_count).then_some(HeaderDrift {
        expected: anchors.len(),
        found: translated_count,
    });

    let aligned = (0..translated_count)
        .map(|i| anchors.get(i).cloned().unwrap_or_default())
        .collect();

    (aligned, drift)
}
