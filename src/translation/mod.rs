/*!
 * Structural translation of markdown documentation pages.
 *
 * The page is split into sections, its prose is sent to the model in one
 * request, and the answer is mapped back onto a scaffold of the original so
 * code blocks, tables and comments survive byte for byte:
 *
 * - `document`: sections, heading anchors and the scaffold
 * - `preprocess`: extraction of the prose to translate
 * - `prompts`: prompt templates and builders for translation
 * - `core`: the model boundary and token accounting
 * - `reassembly`: drift reconciliation and scaffold filling
 * - `pipeline`: one page end to end
 */

// Re-export main types for easier usage
pub use self::core::{TokenUsageStats, TranslationResult, TranslationService};
pub use self::pipeline::{DocumentPipeline, DocumentTranslation};
pub use self::reassembly::{Diagnostic, Reassembled, Reassembler, ReassemblyPolicy, fill_scaffold};

// Re-export document model types
pub use self::document::{Document, Scaffold, Section, Segmentation, derive_anchor, slugify};

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod core;
pub mod document;
pub mod pipeline;
pub mod preprocess;
pub mod prompts;
pub mod reassembly;
