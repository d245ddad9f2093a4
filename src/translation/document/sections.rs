/*!
 * Flat heading segmentation for markdown prose.
 *
 * Every ATX heading line (`#`, `##`, ...) starts a new section regardless of
 * its level. Text before the first heading is kept as the preamble.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Heading line: hash marker, horizontal whitespace, title up to end of line
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(#+[ \t]+)(.*)$").expect("Invalid heading regex")
});

/// One heading and the text that follows it up to the next heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Number of leading `#` characters
    pub level: usize,
    /// Raw heading marker including trailing whitespace (e.g. "## ")
    pub marker: String,
    /// Heading title without the marker
    pub title: String,
    /// Text between the end of the heading line and the next heading
    pub body: String,
    /// Byte offset of the heading line in the segmented text
    pub offset: usize,
}

impl Section {
    /// Render the section back to text, with an optional suffix on the title
    pub fn render_with_suffix(&self, suffix: &str) -> String {
        let mut out = String::with_capacity(
            self.marker.len() + self.title.len() + suffix.len() + self.body.len(),
        );
        out.push_str(&self.marker);
        out.push_str(&self.title);
        out.push_str(suffix);
        out.push_str(&self.body);
        out
    }
}

/// Ordered sections of a prose stream
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmentation {
    /// Text before the first heading (not a section)
    pub preamble: String,
    /// Sections in document order
    pub sections: Vec<Section>,
}

impl Segmentation {
    /// Split text into sections at every heading line
    pub fn split(text: &str) -> Self {
        let headings: Vec<_> = HEADING_REGEX.captures_iter(text).collect();

        let Some(first) = headings.first() else {
            return Self {
                preamble: text.to_string(),
                sections: Vec::new(),
            };
        };

        let preamble_end = first.get(0).map_or(0, |m| m.start());
        let mut sections = Vec::with_capacity(headings.len());

        for (i, cap) in headings.iter().enumerate() {
            let (Some(whole), Some(marker), Some(title)) = (cap.get(0), cap.get(1), cap.get(2))
            else {
                continue;
            };
            let body_end = headings
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());

            sections.push(Section {
                level: marker.as_str().chars().take_while(|c| *c == '#').count(),
                marker: marker.as_str().to_string(),
                title: title.as_str().to_string(),
                body: text[whole.end()..body_end].to_string(),
                offset: whole.start(),
            });
        }

        Self {
            preamble: text[..preamble_end].to_string(),
            sections,
        }
    }

    /// Number of headings
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the text had no headings at all
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Heading titles in order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.title.as_str())
    }

    /// Concatenate preamble and sections back into a single stream
    pub fn reconstruct(&self) -> String {
        let mut out = self.preamble.clone();
        for section in &self.sections {
            out.push_str(&section.render_with_suffix(""));
        }
        out
    }
}

/// Split prose into blank-line separated paragraphs
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}
