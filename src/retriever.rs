/*!
 * Missing-translation scanner.
 *
 * Compares the source-language documentation tree of a local checkout with
 * the target-language tree and lists pages that have no translation yet:
 *
 * ```text
 * <repo>/<docs_root>/<source>/quicktour.md   (source page)
 * <repo>/<docs_root>/<target>/quicktour.md   (translation, if any)
 * ```
 */

use anyhow::{Result, anyhow};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One source page and the state of its translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDoc {
    /// Path relative to the source language folder (e.g. `main_classes/model.md`)
    pub relative_path: String,
    /// Repository-relative source page (e.g. `docs/source/en/main_classes/model.md`)
    pub original_file: String,
    /// Repository-relative translation path
    pub translation_file: String,
    /// Whether the translation file exists
    pub translation_exists: bool,
}

/// Translation coverage of one target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Target language folder name
    pub lang: String,
    docs: Vec<TranslationDoc>,
}

impl Summary {
    /// Create an empty summary
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            docs: Vec::new(),
        }
    }

    /// Record one page
    pub fn append_file(&mut self, doc: TranslationDoc) {
        self.docs.push(doc);
    }

    /// All recorded pages in scan order
    pub fn docs(&self) -> &[TranslationDoc] {
        &self.docs
    }

    /// Number of source pages analyzed
    pub fn files_analyzed(&self) -> usize {
        self.docs.len()
    }

    /// Number of source pages without translation
    pub fn files_missing_translation(&self) -> usize {
        self.missing().count()
    }

    /// Share of pages without translation, in percent
    pub fn percentage_missing_translation(&self) -> f64 {
        if self.docs.is_empty() {
            return 0.0;
        }
        self.files_missing_translation() as f64 * 100.0 / self.files_analyzed() as f64
    }

    /// Pages without translation, in scan order
    pub fn missing(&self) -> impl Iterator<Item = &TranslationDoc> {
        self.docs.iter().filter(|doc| !doc.translation_exists)
    }

    /// The first `k` pages without translation
    pub fn first_missing(&self, k: usize) -> Vec<&TranslationDoc> {
        self.missing().take(k).collect()
    }

    /// Drop pages someone is already translating.
    ///
    /// Entries may be given relative to the language folder or to the repository.
    pub fn without_in_progress(&self, in_progress: &[String]) -> Self {
        let docs = self
            .docs
            .iter()
            .filter(|doc| {
                !in_progress
                    .iter()
                    .any(|p| *p == doc.relative_path || *p == doc.original_file)
            })
            .cloned()
            .collect();

        Self {
            lang: self.lang.clone(),
            docs,
        }
    }

    /// Markdown status table for the operator
    pub fn report_table(&self) -> String {
        format!(
            "| Item | Count | Percentage |\n\
             |------|-------|------------|\n\
             | 📂 Source docs | {} | - |\n\
             | 🪹 Missing translations | {} | {:.2}% |\n",
            self.files_analyzed(),
            self.files_missing_translation(),
            self.percentage_missing_translation()
        )
    }
}

/// Join path components with `/` regardless of platform
fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Scan a checkout for source pages missing a translation
pub fn scan<P: AsRef<Path>>(repo: P, docs_root: &str, source: &str, target: &str) -> Result<Summary> {
    let repo = repo.as_ref();
    let docs_root = Path::new(docs_root);
    let source_dir = repo.join(docs_root).join(source);
    let target_dir = repo.join(docs_root).join(target);

    if !source_dir.is_dir() {
        return Err(anyhow!("Source docs directory not found: {}", source_dir.display()));
    }

    let mut summary = Summary::new(target);

    for entry in WalkDir::new(&source_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| anyhow!("Failed to walk {}: {}", source_dir.display(), e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let relative: PathBuf = path
            .strip_prefix(&source_dir)
            .map_err(|e| anyhow!("Unexpected path {}: {}", path.display(), e))?
            .to_path_buf();

        let translation_exists = target_dir.join(&relative).is_file();
        summary.append_file(TranslationDoc {
            relative_path: to_slash_path(&relative),
            original_file: to_slash_path(&docs_root.join(source).join(&relative)),
            translation_file: to_slash_path(&docs_root.join(target).join(&relative)),
            translation_exists,
        });
    }

    debug!(
        "Scanned {} pages, {} missing {} translation",
        summary.files_analyzed(),
        summary.files_missing_translation(),
        target
    );
    Ok(summary)
}
