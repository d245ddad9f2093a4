/*!
 * Document scaffold: the original text with each prose paragraph replaced
 * by a numbered slot.
 *
 * Paragraphs are placed in order, each at its first occurrence in the text
 * that is still literal. Repeated paragraphs are only scaffolded once.
 */

use std::collections::BTreeMap;

use super::sections::split_paragraphs;

/// Prefix used when a scaffold is rendered as text
pub const PLACEHOLDER_PREFIX: &str = "placeholder_";

/// Render the placeholder token for a slot index
pub fn placeholder_token(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}")
}

/// Piece of a scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldPiece {
    /// Text copied verbatim from the original document
    Literal(String),
    /// Slot for the translated paragraph with this index
    Slot(usize),
}

/// Template of the original document with prose paragraphs cut out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pieces: Vec<ScaffoldPiece>,
    /// Paragraph indices that could not be located in the document
    unplaced: Vec<usize>,
    /// Paragraphs in the prose extraction
    paragraph_count: usize,
}

/// Translated paragraph text by slot index
pub type PlaceholderMap = BTreeMap<usize, String>;

impl Scaffold {
    /// Build a scaffold from the full document and its prose-only extraction
    pub fn build(content: &str, prose: &str) -> Self {
        let mut pieces = vec![ScaffoldPiece::Literal(content.to_string())];
        let mut unplaced = Vec::new();
        let paragraphs = split_paragraphs(prose);
        let paragraph_count = paragraphs.len();

        for (index, paragraph) in paragraphs.into_iter().enumerate() {
            if !Self::place(&mut pieces, paragraph, index) {
                unplaced.push(index);
            }
        }

        pieces.retain(|piece| !matches!(piece, ScaffoldPiece::Literal(text) if text.is_empty()));
        Self {
            pieces,
            unplaced,
            paragraph_count,
        }
    }

    /// Replace the first literal occurrence of `paragraph` with a slot
    fn place(pieces: &mut Vec<ScaffoldPiece>, paragraph: &str, index: usize) -> bool {
        let hit = pieces.iter().enumerate().find_map(|(i, piece)| match piece {
            ScaffoldPiece::Literal(text) => text.find(paragraph).map(|at| (i, at)),
            ScaffoldPiece::Slot(_) => None,
        });

        let Some((piece_index, at)) = hit else {
            return false;
        };
        let ScaffoldPiece::Literal(text) = &pieces[piece_index] else {
            return false;
        };

        let before = text[..at].to_string();
        let after = text[at + paragraph.len()..].to_string();
        pieces[piece_index] = ScaffoldPiece::Literal(before);
        pieces.insert(piece_index + 1, ScaffoldPiece::Slot(index));
        pieces.insert(piece_index + 2, ScaffoldPiece::Literal(after));
        true
    }

    /// Number of slots in the scaffold
    pub fn placeholder_count(&self) -> usize {
        self.pieces
            .iter()
            .filter(|piece| matches!(piece, ScaffoldPiece::Slot(_)))
            .count()
    }

    /// Slot indices in ascending order
    pub fn slot_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .pieces
            .iter()
            .filter_map(|piece| match piece {
                ScaffoldPiece::Slot(index) => Some(*index),
                ScaffoldPiece::Literal(_) => None,
            })
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Paragraphs in the prose the scaffold was built from
    pub fn paragraph_count(&self) -> usize {
        self.paragraph_count
    }

    /// Paragraph indices that had no literal occurrence left in the document
    pub fn unplaced(&self) -> &[usize] {
        &self.unplaced
    }

    /// Pieces in document order
    pub fn pieces(&self) -> &[ScaffoldPiece] {
        &self.pieces
    }

    /// Render the template with `placeholder_N` tokens in place of slots
    pub fn render(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                ScaffoldPiece::Literal(text) => text.clone(),
                ScaffoldPiece::Slot(index) => placeholder_token(*index),
            })
            .collect()
    }

    /// Substitute every slot with its translated paragraph.
    ///
    /// Returns `None` if a slot has no entry in the map.
    pub fn fill(&self, paragraphs: &PlaceholderMap) -> Option<String> {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                ScaffoldPiece::Literal(text) => out.push_str(text),
                ScaffoldPiece::Slot(index) => out.push_str(paragraphs.get(index)?),
            }
        }
        Some(out)
    }
}
