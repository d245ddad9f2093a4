/*!
 * Immutable source document for one translation request.
 */

use super::anchors::anchors_for;
use super::scaffold::Scaffold;
use super::sections::Segmentation;

/// Original page plus everything derived from it before translation.
///
/// Created once per request and never mutated; the reassembler only reads it.
#[derive(Debug, Clone)]
pub struct Document {
    content: String,
    prose: String,
    segmentation: Segmentation,
    anchors: Vec<String>,
    scaffold: Scaffold,
}

impl Document {
    /// Derive segmentation, anchors and scaffold from the raw page and its
    /// prose-only extraction
    pub fn new(content: impl Into<String>, prose: impl Into<String>) -> Self {
        let content = content.into();
        let prose = prose.into();
        let segmentation = Segmentation::split(&prose);
        let anchors = anchors_for(&segmentation);
        let scaffold = Scaffold::build(&content, &prose);

        Self {
            content,
            prose,
            segmentation,
            anchors,
            scaffold,
        }
    }

    /// Raw page text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Prose sent to the model
    pub fn prose(&self) -> &str {
        &self.prose
    }

    /// Segmentation of the prose
    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    /// Source-language anchors, one per heading
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Scaffold of the raw page
    pub fn scaffold(&self) -> &Scaffold {
        &self.scaffold
    }

    /// Number of prose paragraphs
    pub fn paragraph_count(&self) -> usize {
        self.scaffold.paragraph_count()
    }
}
