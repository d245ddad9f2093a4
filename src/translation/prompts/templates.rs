/*!
 * Prompt templates for documentation translation.
 *
 * The model receives one message: the instruction, optional extra guidance
 * from the operator, and the prose wrapped in a ```md fence.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// A response wrapped in a single markdown fence
static ECHOED_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\s*```(?:md|markdown)?[ \t]*\n(.*?)\n?```\s*\z")
        .expect("Invalid echoed fence regex")
});

/// Instruction template for documentation translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default instruction for library documentation.
    pub const DOCS_TRANSLATOR: &'static str = "What do these sentences about Hugging Face Transformers \
(a machine learning library) mean in {language}? \
Please do not translate the word after a 🤗 emoji as it is a product name. \
Output only the translated markdown result without any explanations or introductions.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default documentation translator template.
    pub fn docs_translator() -> Self {
        Self::new(Self::DOCS_TRANSLATOR)
    }

    /// Render the template for a target language name.
    pub fn render(&self, language: &str) -> String {
        self.template.replace("{language}", language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::docs_translator()
    }
}

/// Builder for the full translation prompt.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    language: String,
    template: PromptTemplate,
    custom_instructions: Option<String>,
}

impl TranslationPromptBuilder {
    /// Create a new prompt builder for a target language name (e.g. "Korean").
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            template: PromptTemplate::default(),
            custom_instructions: None,
        }
    }

    /// Use a different instruction template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set custom instructions; blank input is ignored.
    pub fn with_custom_instructions(mut self, instructions: &str) -> Self {
        let trimmed = instructions.trim();
        self.custom_instructions = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Build the prompt for the given prose.
    pub fn build(&self, prose: &str) -> String {
        let mut instruction = self.template.render(&self.language);
        if let Some(custom) = &self.custom_instructions {
            instruction.push_str("\n\n");
            instruction.push_str(custom);
        }
        instruction.push_str("\n\n```md");

        [instruction.as_str(), prose.trim(), "```"].join("\n")
    }
}

/// Remove a single ```md fence wrapping the whole model response.
///
/// Responses that merely contain code blocks are returned unchanged.
pub fn strip_markdown_fence(response: &str) -> String {
    match ECHOED_FENCE_REGEX.captures(response) {
        Some(cap) => {
            let inner = cap.get(1).map_or("", |m| m.as_str());
            if inner.contains("```") {
                response.to_string()
            } else {
                inner.to_string()
            }
        }
        None => response.to_string(),
    }
}
