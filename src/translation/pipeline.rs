/*!
 * One-document translation pipeline.
 *
 * preprocess → prompt → model → fence cleanup → reassembly. A single model
 * call per page; any fatal error aborts the page without partial output.
 */

use log::{debug, info, warn};

use crate::errors::TranslationError;
use crate::translation::core::{TokenUsageStats, TranslationService};
use crate::translation::document::Document;
use crate::translation::preprocess::{extract_translatable, has_translatable_content};
use crate::translation::prompts::{TranslationPromptBuilder, strip_markdown_fence};
use crate::translation::reassembly::{Diagnostic, Reassembler, ReassemblyPolicy};

/// Translated page with everything a reviewer needs to know about it
#[derive(Debug, Clone)]
pub struct DocumentTranslation {
    /// Final translated page
    pub document: String,
    /// Token usage of the model call
    pub usage: TokenUsageStats,
    /// Non-fatal reassembly findings
    pub diagnostics: Vec<Diagnostic>,
}

/// Translates whole documentation pages
#[derive(Debug)]
pub struct DocumentPipeline {
    service: TranslationService,
    prompt_builder: TranslationPromptBuilder,
    reassembler: Reassembler,
}

impl DocumentPipeline {
    /// Create a pipeline translating into `language` (a language name, e.g. "Korean")
    pub fn new(service: TranslationService, language: &str, policy: ReassemblyPolicy) -> Self {
        Self {
            service,
            prompt_builder: TranslationPromptBuilder::new(language),
            reassembler: Reassembler::new(policy),
        }
    }

    /// Append an extra instruction to every prompt
    pub fn with_custom_instructions(mut self, instructions: &str) -> Self {
        self.prompt_builder = self.prompt_builder.with_custom_instructions(instructions);
        self
    }

    /// Underlying translation service
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Extract the prose of a page and derive its anchors and scaffold
    pub fn prepare(&self, content: &str) -> Result<Document, TranslationError> {
        if content.trim().is_empty() {
            return Err(TranslationError::SourceContent("document is empty".to_string()));
        }

        let prose = extract_translatable(content);
        if !has_translatable_content(&prose) {
            return Err(TranslationError::SourceContent(
                "document has no heading or no prose to translate".to_string(),
            ));
        }

        let document = Document::new(content, prose.trim_end());
        debug!(
            "Prepared document: {} headings, {} placeholders",
            document.anchors().len(),
            document.scaffold().placeholder_count()
        );
        Ok(document)
    }

    /// Render the prompt that would be sent for a prepared document
    pub fn prompt_for(&self, document: &Document) -> String {
        self.prompt_builder.build(document.prose())
    }

    /// Translate one page end to end
    pub async fn translate_document(&self, content: &str) -> Result<DocumentTranslation, TranslationError> {
        let document = self.prepare(content)?;
        let prompt = self.prompt_for(&document);

        let result = self.service.translate(&prompt).await?;
        let translated = strip_markdown_fence(&result.text);

        let reassembled = self.reassembler.reassemble_document(&document, &translated)?;
        for diagnostic in &reassembled.diagnostics {
            warn!("{}", diagnostic);
        }

        info!(
            "Translated document ({} placeholders, {} tokens)",
            document.scaffold().placeholder_count(),
            result.usage.total_tokens
        );

        Ok(DocumentTranslation {
            document: reassembled.document,
            usage: result.usage,
            diagnostics: reassembled.diagnostics,
        })
    }
}
