/*!
 * Document modeling for markdown translation.
 *
 * This module splits a documentation page into the pieces the translation
 * transform works with:
 * - `sections`: flat heading segmentation of the prose
 * - `anchors`: doc-builder compatible heading anchors
 * - `scaffold`: the original page with prose paragraphs cut out
 * - `model`: the immutable `Document` tying them together
 */

pub mod anchors;
pub mod model;
pub mod scaffold;
pub mod sections;

// Re-export types used by other modules
pub use anchors::{HeaderDrift, align_anchors, anchors_for, derive_anchor, slugify};
pub use model::Document;
pub use scaffold::{PlaceholderMap, Scaffold, ScaffoldPiece, placeholder_token};
pub use sections::{Section, Segmentation, split_paragraphs};
