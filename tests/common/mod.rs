/*!
 * Common test utilities for the i18n-agent test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use i18n_agent::app_config::{Config, TranslationProvider};

// Re-export the mock provider helpers
pub mod mock_providers;

/// A documentation page with a license header, a code block and a table
pub const SAMPLE_PAGE: &str = "<!--Copyright 2024 The HuggingFace Team. All rights reserved.\n\nLicensed under the Apache License.\n-->\n\n# Quick tour\n\nGet up and running with the library.\n\n```py\nfrom transformers import pipeline\n# Not a heading\n```\n\n| Task | Pipeline |\n|------|----------|\n| Text | `text-generation` |\n\n## Pipeline\n\nThe pipeline is the easiest way to use a model.\n";

/// Prose of `SAMPLE_PAGE` as extracted for the model
pub const SAMPLE_PROSE: &str = "# Quick tour\n\nGet up and running with the library.\n\n## Pipeline\n\nThe pipeline is the easiest way to use a model.";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a docs checkout under `dir`: `docs/source/<lang>/<relative>` for each page
pub fn create_docs_repo(dir: &Path, pages: &[(&str, &str, &str)]) -> Result<()> {
    for (lang, relative, content) in pages {
        create_test_file(dir, &format!("docs/source/{}/{}", lang, relative), content)?;
    }
    Ok(())
}

/// Configuration translating en → ko with the offline provider
pub fn mock_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Mock;
    config.docs.output_dir = output_dir.to_string_lossy().to_string();
    config
}
