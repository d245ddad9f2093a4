/*!
 * Prompt assembly for documentation translation.
 *
 * This module provides:
 * - The instruction template sent ahead of the prose
 * - A builder that wraps the prose in a markdown fence
 * - Cleanup of fences echoed back by the model
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, TranslationPromptBuilder, strip_markdown_fence};
