/*!
 * Reassembly of a translated document.
 *
 * The translated prose is segmented, the anchors derived once from the source
 * document are reattached to the translated headings by position, and the
 * resulting paragraphs are poured back into the scaffold of the original page.
 *
 * Heading drift is always reported and, unless the policy caps it, tolerated.
 * Paragraph drift is tolerated up to `max_paragraph_drift`; past that the
 * document is rejected instead of being emitted with misplaced text.
 */

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ReassemblyError;
use crate::translation::document::{
    Document, PlaceholderMap, Scaffold, Segmentation, align_anchors, split_paragraphs,
};

/// Markdown code fence delimiter
const FENCE: &str = "```";

/// Thresholds between recoverable drift and fatal mismatch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReassemblyPolicy {
    /// Largest paragraph-count difference that is padded or truncated
    #[serde(default = "default_max_paragraph_drift")]
    pub max_paragraph_drift: usize,

    /// Largest heading-count difference tolerated (`None` = unlimited)
    #[serde(default)]
    pub max_header_drift: Option<usize>,
}

fn default_max_paragraph_drift() -> usize {
    2
}

impl Default for ReassemblyPolicy {
    fn default() -> Self {
        Self {
            max_paragraph_drift: default_max_paragraph_drift(),
            max_header_drift: None,
        }
    }
}

impl ReassemblyPolicy {
    /// Reject any paragraph drift
    pub fn strict() -> Self {
        Self {
            max_paragraph_drift: 0,
            max_header_drift: None,
        }
    }
}

/// Non-fatal findings that callers may want a human to review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Source and translation have a different number of headings
    HeaderDrift { expected: usize, found: usize },
    /// Paragraphs were padded or truncated to fit the scaffold
    ParagraphDrift { expected: usize, found: usize },
    /// A heading sits inside a code fence in the translation; no anchor added
    FencedHeading { index: usize, title: String },
    /// Source paragraphs that could not be located in the page stay untranslated
    UnplacedParagraphs { indices: Vec<usize> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderDrift { expected, found } => write!(
                f,
                "Header count mismatch: expected {} headings, found {}",
                expected, found
            ),
            Self::ParagraphDrift { expected, found } => write!(
                f,
                "Paragraph count mismatch: expected {}, found {} (padded/truncated)",
                expected, found
            ),
            Self::FencedHeading { index, title } => {
                write!(f, "Heading #{} '{}' is inside a code fence", index, title)
            }
            Self::UnplacedParagraphs { indices } => {
                write!(f, "Paragraphs {:?} were not found in the source page", indices)
            }
        }
    }
}

/// Successfully reassembled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassembled {
    /// Final translated page
    pub document: String,
    /// Drift and alignment findings
    pub diagnostics: Vec<Diagnostic>,
}

impl Reassembled {
    /// Whether the reassembly needed any best-effort adjustment
    pub fn has_drift(&self) -> bool {
        self.diagnostics.iter().any(|d| {
            matches!(d, Diagnostic::HeaderDrift { .. } | Diagnostic::ParagraphDrift { .. })
        })
    }
}

/// Maps translated prose back onto a scaffold
#[derive(Debug, Clone, Default)]
pub struct Reassembler {
    policy: ReassemblyPolicy,
}

impl Reassembler {
    /// Create a reassembler with the given policy
    pub fn new(policy: ReassemblyPolicy) -> Self {
        Self { policy }
    }

    /// Active policy
    pub fn policy(&self) -> &ReassemblyPolicy {
        &self.policy
    }

    /// Reassemble a prepared document with its translated prose.
    ///
    /// Anchors and scaffold come from the document; only the translation is
    /// segmented here.
    pub fn reassemble_document(
        &self,
        document: &Document,
        translated: &str,
    ) -> Result<Reassembled, ReassemblyError> {
        let scaffold = document.scaffold();
        if translated.trim().is_empty() {
            return Err(ReassemblyError::SectionCountMismatch {
                expected: scaffold.placeholder_count(),
                found: 0,
            });
        }

        let mut diagnostics = Vec::new();
        let target = Segmentation::split(translated);

        let (aligned, drift) = align_anchors(document.anchors(), target.len());
        if let Some(drift) = drift {
            let amount = drift.expected.abs_diff(drift.found);
            if self.policy.max_header_drift.is_some_and(|max| amount > max) {
                return Err(ReassemblyError::HeaderCountMismatch {
                    expected: drift.expected,
                    found: drift.found,
                });
            }
            warn!(
                "Header count mismatch: source has {} headings, translation has {}",
                drift.expected, drift.found
            );
            diagnostics.push(Diagnostic::HeaderDrift {
                expected: drift.expected,
                found: drift.found,
            });
        }

        let stream = Self::attach_anchors(&target, &aligned, translated, &mut diagnostics);
        let paragraphs = Self::placeable_paragraphs(&stream, scaffold, &mut diagnostics);
        let paragraphs = self.reconcile(paragraphs, scaffold, &mut diagnostics)?;

        let slots = scaffold.slot_indices();
        if slots.len() != paragraphs.len() {
            return Err(ReassemblyError::SectionCountMismatch {
                expected: slots.len(),
                found: paragraphs.len(),
            });
        }

        let map: PlaceholderMap = slots.into_iter().zip(paragraphs).collect();
        let page = scaffold
            .fill(&map)
            .ok_or(ReassemblyError::SectionCountMismatch {
                expected: scaffold.placeholder_count(),
                found: map.len(),
            })?;

        debug!(
            "Reassembled document: {} placeholders, {} diagnostics",
            scaffold.placeholder_count(),
            diagnostics.len()
        );

        Ok(Reassembled {
            document: page,
            diagnostics,
        })
    }

    /// Reassemble from the raw page, its extracted prose, and the translated prose
    pub fn reassemble(
        &self,
        content: &str,
        original_prose: &str,
        translated: &str,
    ) -> Result<Reassembled, ReassemblyError> {
        self.reassemble_document(&Document::new(content, original_prose), translated)
    }

    /// Rebuild the translated prose with anchors appended to headings outside fences
    fn attach_anchors(
        target: &Segmentation,
        aligned: &[String],
        translated: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let mut stream = target.preamble.clone();

        for (index, (section, anchor)) in target.sections.iter().zip(aligned).enumerate() {
            let fenced = is_inside_fence(translated, section.offset);
            if fenced && !anchor.is_empty() {
                diagnostics.push(Diagnostic::FencedHeading {
                    index,
                    title: section.title.clone(),
                });
            }

            let suffix = if fenced || anchor.is_empty() {
                String::new()
            } else {
                format!(" {}", anchor)
            };
            stream.push_str(&section.render_with_suffix(&suffix));
        }

        stream
    }

    /// Split the stream into paragraphs, dropping those whose source has no slot
    fn placeable_paragraphs(
        stream: &str,
        scaffold: &Scaffold,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<String> {
        let unplaced = scaffold.unplaced();
        if !unplaced.is_empty() {
            warn!("{} source paragraphs have no place in the page", unplaced.len());
            diagnostics.push(Diagnostic::UnplacedParagraphs {
                indices: unplaced.to_vec(),
            });
        }

        split_paragraphs(stream)
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !unplaced.contains(index))
            .map(|(_, paragraph)| paragraph.to_string())
            .collect()
    }

    /// Pad or truncate paragraphs to the slot count within the drift budget
    fn reconcile(
        &self,
        mut paragraphs: Vec<String>,
        scaffold: &Scaffold,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<String>, ReassemblyError> {
        let expected = scaffold.placeholder_count();
        let found = paragraphs.len();
        if expected == found {
            return Ok(paragraphs);
        }

        if expected.abs_diff(found) > self.policy.max_paragraph_drift {
            return Err(ReassemblyError::SectionCountMismatch { expected, found });
        }

        warn!(
            "Paragraph count mismatch: expected {}, found {}; padding/truncating",
            expected, found
        );
        paragraphs.resize(expected, String::new());
        diagnostics.push(Diagnostic::ParagraphDrift { expected, found });
        Ok(paragraphs)
    }
}

/// Whether `offset` lies inside a fenced code block of `text`
pub fn is_inside_fence(text: &str, offset: usize) -> bool {
    text.get(..offset)
        .is_some_and(|before| before.matches(FENCE).count() % 2 == 1)
}

/// Reassemble with the default policy
pub fn fill_scaffold(
    content: &str,
    original_prose: &str,
    translated: &str,
) -> Result<Reassembled, ReassemblyError> {
    Reassembler::default().reassemble(content, original_prose, translated)
}
