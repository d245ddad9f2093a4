/*!
 * Wizard steps and the immutable session value.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SessionError;

/// Step of the translation wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Nothing done yet
    Welcome,
    /// Missing translations have been listed
    FindFiles,
    /// The current file is being translated
    Translate,
    /// A translation waits for the operator
    Review,
    /// The translation is approved and ready for a pull request
    CreatePr,
}

impl Step {
    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Welcome => "welcome",
            Step::FindFiles => "find_files",
            Step::Translate => "translate",
            Step::Review => "review",
            Step::CreatePr => "create_pr",
        }
    }

    /// Whether `next` may follow this step
    pub fn can_transition_to(self, next: Step) -> bool {
        matches!(
            (self, next),
            (Step::Welcome, Step::FindFiles)
                | (Step::FindFiles, Step::FindFiles)
                | (Step::FindFiles, Step::Translate)
                | (Step::Translate, Step::Review)
                | (Step::Review, Step::Translate)
                | (Step::Review, Step::CreatePr)
                | (Step::CreatePr, Step::FindFiles)
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the wizard knows at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    step: Step,
    target_language: String,
    k_files: usize,
    files_to_translate: Vec<String>,
    current_file: Option<String>,
    translated_content: Option<String>,
    additional_instruction: String,
    version: u64,
}

impl SessionState {
    /// Fresh session at the welcome step
    pub fn new(target_language: impl Into<String>, k_files: usize) -> Self {
        Self {
            step: Step::Welcome,
            target_language: target_language.into(),
            k_files,
            files_to_translate: Vec::new(),
            current_file: None,
            translated_content: None,
            additional_instruction: String::new(),
            version: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn k_files(&self) -> usize {
        self.k_files
    }

    pub fn files_to_translate(&self) -> &[String] {
        &self.files_to_translate
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn translated_content(&self) -> Option<&str> {
        self.translated_content.as_deref()
    }

    pub fn additional_instruction(&self) -> &str {
        &self.additional_instruction
    }

    /// Incremented by every successful update
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Copy of this state moved to `to`, if the move is allowed
    fn advance(&self, to: Step) -> Result<Self, SessionError> {
        if !self.step.can_transition_to(to) {
            return Err(SessionError::InvalidTransition {
                from: self.step.to_string(),
                to: to.to_string(),
            });
        }

        let mut next = self.clone();
        next.step = to;
        next.version += 1;
        Ok(next)
    }

    /// Change the extra prompt instruction without moving
    pub fn with_additional_instruction(&self, instruction: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.additional_instruction = instruction.into();
        next.version += 1;
        next
    }

    /// Record the files found for translation (at most `k_files` are kept)
    pub fn files_found(&self, files: Vec<String>) -> Result<Self, SessionError> {
        let mut next = self.advance(Step::FindFiles)?;
        next.files_to_translate = files.into_iter().take(self.k_files).collect();
        next.current_file = None;
        next.translated_content = None;
        Ok(next)
    }

    /// Start translating the first listed file
    pub fn start_translation(&self) -> Result<Self, SessionError> {
        let first = self
            .files_to_translate
            .first()
            .cloned()
            .ok_or_else(|| SessionError::MissingData("files to translate".to_string()))?;

        let mut next = self.advance(Step::Translate)?;
        next.current_file = Some(first);
        next.translated_content = None;
        Ok(next)
    }

    /// Store the translated document for review
    pub fn translation_ready(&self, content: impl Into<String>) -> Result<Self, SessionError> {
        let mut next = self.advance(Step::Review)?;
        next.translated_content = Some(content.into());
        Ok(next)
    }

    /// Discard the reviewed translation and translate the same file again
    pub fn retry_translation(&self) -> Result<Self, SessionError> {
        if self.step != Step::Review {
            return Err(SessionError::InvalidTransition {
                from: self.step.to_string(),
                to: Step::Translate.to_string(),
            });
        }

        let mut next = self.advance(Step::Translate)?;
        next.translated_content = None;
        Ok(next)
    }

    /// Approve the reviewed translation
    pub fn approve(&self) -> Result<Self, SessionError> {
        if self.translated_content.is_none() {
            return Err(SessionError::MissingData("translated content".to_string()));
        }
        self.advance(Step::CreatePr)
    }

    /// Go back to the file list with the approved file removed
    pub fn next_file(&self) -> Result<Self, SessionError> {
        let mut next = self.advance(Step::FindFiles)?;
        if let Some(done) = &self.current_file {
            next.files_to_translate.retain(|file| file != done);
        }
        next.current_file = None;
        next.translated_content = None;
        Ok(next)
    }
}
