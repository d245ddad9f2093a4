use anyhow::{Result, Context, anyhow};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::fs::OpenOptions;
use std::io::Write;
use chrono::Local;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @validates: Page path relative to the language folder, no escaping it
    pub fn validate_relative_path(relative_path: &str) -> Result<PathBuf> {
        let path = Path::new(relative_path);
        let escapes = path.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });

        if relative_path.trim().is_empty() || escapes {
            return Err(anyhow!("Invalid document path: {:?}", relative_path));
        }
        Ok(path.to_path_buf())
    }

    // @generates: Path of a page inside a language folder
    // @params: base, docs_root, language, relative page path
    pub fn language_path<P: AsRef<Path>, R: AsRef<Path>>(
        base: P,
        docs_root: &str,
        language: &str,
        relative_path: R,
    ) -> PathBuf {
        base.as_ref()
            .join(docs_root)
            .join(language)
            .join(relative_path)
    }

    // @generates: Output path for a translated page
    // @returns: <output_dir>/<docs_root>/<target_language>/<relative path>
    pub fn generate_output_path<P: AsRef<Path>, R: AsRef<Path>>(
        output_dir: P,
        docs_root: &str,
        target_language: &str,
        relative_path: R,
    ) -> PathBuf {
        Self::language_path(output_dir, docs_root, target_language, relative_path)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
