use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::retriever::{self, Summary};
use crate::session::SessionState;
use crate::toctree::{self, TOCTREE_FILE, TocEntry, TocPaths};
use crate::translation::preprocess::strip_license_comment;
use crate::translation::{Diagnostic, DocumentPipeline, TokenUsageStats, TranslationService};

// @module: Application controller for documentation translation

/// Name of the per-run log written next to the translated pages
pub const TRANSLATION_LOG_FILE: &str = "translation.log";

/// Result of looking for pages to translate
#[derive(Debug, Clone)]
pub struct FileSearch {
    /// Coverage of the target language (in-progress pages excluded)
    pub summary: Summary,
    /// The first pages without translation, relative to the source folder
    pub files: Vec<String>,
}

/// A page written to the output tree
#[derive(Debug, Clone)]
pub struct TranslatedFile {
    /// Page path relative to the language folder
    pub relative_path: String,
    /// Where the translation was written
    pub output_path: PathBuf,
    /// Token usage of the model call
    pub usage: TokenUsageStats,
    /// Non-fatal reassembly findings
    pub diagnostics: Vec<Diagnostic>,
    /// Entry added to the output toctree, if any
    pub toctree_entry: Option<TocEntry>,
}

/// What would be sent to the model for one page
#[derive(Debug, Clone)]
pub struct Preview {
    /// Page path relative to the language folder
    pub relative_path: String,
    /// Page without its license comment
    pub content: String,
    /// Exact prompt of the translation request
    pub prompt: String,
    /// Source-language anchors, one per heading
    pub anchors: Vec<String>,
    /// Prose paragraphs the translation must return
    pub placeholder_count: usize,
}

/// Main application controller for documentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Page translation pipeline
    pipeline: DocumentPipeline,
    // @field: Target language folder name (ISO 639-1 when available)
    target_folder: String,
    // @field: Source language folder name
    source_folder: String,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(config.translation.clone())
            .context("Failed to create translation service")?;
        Self::with_service(config, service)
    }

    // @method: Create a controller around an existing translation service
    pub fn with_service(config: Config, service: TranslationService) -> Result<Self> {
        let language_name = language_utils::get_language_name(&config.target_language)?;
        let target_folder = language_utils::normalize_to_part1_or_part2t(&config.target_language)?;
        let source_folder = language_utils::normalize_to_part1_or_part2t(&config.source_language)?;

        let pipeline = DocumentPipeline::new(service, &language_name, config.reassembly.clone())
            .with_custom_instructions(&config.translation.common.additional_instruction);

        Ok(Self {
            config,
            pipeline,
            target_folder,
            source_folder,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the provider answers
    pub async fn test_connection(&self) -> Result<()> {
        self.pipeline.service().test_connection().await
            .with_context(|| format!(
                "Failed to connect to {}",
                self.config.translation.provider.display_name()
            ))
    }

    /// Where the translation of a page is written
    pub fn output_path(&self, relative_path: &str) -> PathBuf {
        FileManager::generate_output_path(
            &self.config.docs.output_dir,
            &self.config.docs.docs_root,
            &self.target_folder,
            relative_path,
        )
    }

    /// List the first `k` pages that have no translation in `repo`
    pub fn find_files<P: AsRef<Path>>(&self, repo: P, k: usize) -> Result<FileSearch> {
        let summary = retriever::scan(
            repo,
            &self.config.docs.docs_root,
            &self.source_folder,
            &self.target_folder,
        )?
        .without_in_progress(&self.config.docs.in_progress);

        info!("Translation status for '{}':\n{}", self.target_folder, summary.report_table());

        let files: Vec<String> = summary
            .first_missing(k)
            .into_iter()
            .map(|doc| doc.relative_path.clone())
            .collect();

        if files.is_empty() {
            info!("No files found that need translation.");
        } else {
            for (i, file) in files.iter().enumerate() {
                debug!("{}. {}", i + 1, file);
            }
        }

        Ok(FileSearch { summary, files })
    }

    // @resolves: Source page inside the checkout
    fn source_path<P: AsRef<Path>>(&self, repo: P, relative_path: &str) -> Result<PathBuf, AppError> {
        let relative = FileManager::validate_relative_path(relative_path)
            .map_err(|e| AppError::File(e.to_string()))?;
        Ok(FileManager::language_path(
            repo,
            &self.config.docs.docs_root,
            &self.source_folder,
            &relative,
        ))
    }

    /// Show the cleaned page and the prompt for it without calling the model
    pub fn preview<P: AsRef<Path>>(&self, repo: P, relative_path: &str) -> Result<Preview, AppError> {
        let source_path = self.source_path(repo, relative_path)?;
        let content = FileManager::read_to_string(&source_path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        let document = self.pipeline.prepare(&content)?;
        Ok(Preview {
            relative_path: relative_path.to_string(),
            content: strip_license_comment(&content),
            prompt: self.pipeline.prompt_for(&document),
            anchors: document.anchors().to_vec(),
            placeholder_count: document.scaffold().placeholder_count(),
        })
    }

    /// Add a translated page to the output toctree
    pub fn register_in_toctree<P: AsRef<Path>>(
        &self,
        repo: P,
        relative_path: &str,
        translated: &str,
    ) -> Result<Option<TocEntry>> {
        let repo = repo.as_ref();
        let docs_root = &self.config.docs.docs_root;
        let source = FileManager::language_path(repo, docs_root, &self.source_folder, TOCTREE_FILE);
        let target = FileManager::language_path(repo, docs_root, &self.target_folder, TOCTREE_FILE);
        let output = self.output_path(TOCTREE_FILE);

        toctree::register_page(
            &TocPaths {
                source: &source,
                target: &target,
                output: &output,
            },
            relative_path,
            translated,
        )
    }

    /// Translate one page of `repo` and write it to the output tree.
    ///
    /// Nothing is written when the translation fails or when the output exists
    /// and `force` is not set.
    pub async fn translate_file<P: AsRef<Path>>(
        &self,
        repo: P,
        relative_path: &str,
        force: bool,
    ) -> Result<TranslatedFile, AppError> {
        let repo = repo.as_ref();
        let source_path = self.source_path(repo, relative_path)?;
        let output_path = self.output_path(relative_path);

        if FileManager::file_exists(&output_path) && !force {
            return Err(AppError::File(format!(
                "Translation already exists: {} (use --force to overwrite)",
                output_path.display()
            )));
        }

        let content = FileManager::read_to_string(&source_path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Translating {}", relative_path));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.pipeline.translate_document(&content).await;
        spinner.finish_and_clear();

        let translation = match result {
            Ok(translation) => translation,
            Err(e) => {
                error!("Failed to translate {}: {}", relative_path, e);
                return Err(e.into());
            }
        };

        FileManager::write_to_file(&output_path, &translation.document)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        let log_path = Path::new(&self.config.docs.output_dir).join(TRANSLATION_LOG_FILE);
        let mut log_line = format!(
            "{} -> {} ({} tokens)",
            relative_path,
            output_path.display(),
            translation.usage.total_tokens
        );
        for diagnostic in &translation.diagnostics {
            log_line.push_str(&format!("\n    {}", diagnostic));
        }
        if let Err(e) = FileManager::append_to_log_file(&log_path, &log_line) {
            warn!("Could not update {}: {}", log_path.display(), e);
        }

        let toctree_entry = if self.config.docs.update_toctree {
            self.register_in_toctree(repo, relative_path, &translation.document)
                .unwrap_or_else(|e| {
                    warn!("Could not update {}: {:#}", TOCTREE_FILE, e);
                    None
                })
        } else {
            None
        };

        info!("Success: {}", output_path.display());
        debug!("{}", translation.usage.summary());

        Ok(TranslatedFile {
            relative_path: relative_path.to_string(),
            output_path,
            usage: translation.usage,
            diagnostics: translation.diagnostics,
            toctree_entry,
        })
    }

    /// Walk the whole wizard non-interactively: find up to `k` pages and
    /// translate them one after another.
    ///
    /// Pages whose output already exists are left out unless `force` is set.
    /// Translations with drift are approved but flagged for human review.
    pub async fn run_session<P: AsRef<Path>>(&self, repo: P, k: usize, force: bool) -> Result<SessionState> {
        let repo = repo.as_ref();
        let mut session = SessionState::new(self.target_folder.clone(), k)
            .with_additional_instruction(self.config.translation.common.additional_instruction.clone());

        let search = self.find_files(repo, k)?;
        let files: Vec<String> = search
            .files
            .into_iter()
            .filter(|file| {
                let exists = FileManager::file_exists(self.output_path(file));
                if exists && !force {
                    warn!("Skipping {}, translation already exists (use --force to overwrite)", file);
                }
                force || !exists
            })
            .collect();
        session = session.files_found(files)?;

        while !session.files_to_translate().is_empty() {
            session = session.start_translation()?;
            let current = session
                .current_file()
                .map(str::to_string)
                .unwrap_or_default();

            let translated = self.translate_file(repo, &current, force).await
                .with_context(|| format!("Session stopped at {}", current))?;

            if translated.diagnostics.iter().any(|d| !matches!(d, Diagnostic::FencedHeading { .. })) {
                warn!("{} needs a human review before opening a PR", current);
            }

            let content = FileManager::read_to_string(&translated.output_path)?;
            session = session.translation_ready(content)?.approve()?;
            info!("{} is ready for a pull request", current);
            session = session.next_file()?;
        }

        Ok(session)
    }
}
