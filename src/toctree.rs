/*!
 * Registration of translated pages in a language's `_toctree.yml`.
 *
 * The doc builder only renders pages listed in the table of contents of their
 * language folder. After a page is translated, an entry for it is inserted at
 * the position the page has in the source language's toctree. Its title comes
 * from an existing source/target title pair when one exists, otherwise from
 * the translated H1.
 */

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::file_utils::FileManager;

/// File name of the table of contents in each language folder
pub const TOCTREE_FILE: &str = "_toctree.yml";

static H1_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").expect("Invalid H1 regex")
});

static ANCHOR_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*\[\[[^\]]*\]\]$").expect("Invalid anchor suffix regex")
});

/// One node of a toctree: a page (`local`), a section, or both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Page path relative to the language folder, without extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,

    /// Title shown in the navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Nested entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<TocEntry>,

    /// Keys the agent does not interpret (e.g. `isExpanded`), kept as is
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl TocEntry {
    /// Page entry with a title
    pub fn page(local: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            local: Some(local.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Section entry grouping other entries
    pub fn section(title: impl Into<String>, sections: Vec<TocEntry>) -> Self {
        Self {
            title: Some(title.into()),
            sections,
            ..Self::default()
        }
    }
}

/// Parsed `_toctree.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Toctree {
    pub entries: Vec<TocEntry>,
}

impl Toctree {
    /// Parse toctree YAML; a blank document is an empty toctree
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Invalid toctree YAML")
    }

    /// Load a toctree file, `None` when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Ok(None);
        }
        let yaml = FileManager::read_to_string(path)?;
        Self::parse(&yaml)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map(Some)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize toctree")
    }

    /// Index path (top level first) of the entry for `local`
    pub fn position_of(&self, local: &str) -> Option<Vec<usize>> {
        fn search(entries: &[TocEntry], local: &str, path: &mut Vec<usize>) -> bool {
            for (index, entry) in entries.iter().enumerate() {
                path.push(index);
                if entry.local.as_deref() == Some(local) || search(&entry.sections, local, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(&self.entries, local, &mut path).then_some(path)
    }

    /// Whether a page is already listed
    pub fn contains(&self, local: &str) -> bool {
        self.position_of(local).is_some()
    }

    /// Entry for `local`
    pub fn find(&self, local: &str) -> Option<&TocEntry> {
        let path = self.position_of(local)?;
        let (last, parents) = path.split_last()?;
        let mut entries = &self.entries;
        for &index in parents {
            entries = &entries.get(index)?.sections;
        }
        entries.get(*last)
    }

    /// Insert `entry` at the position its page has in `source`.
    ///
    /// Falls back to the end of the deepest existing parent level. Returns
    /// false when the page is already listed.
    pub fn insert_like(&mut self, source: &Toctree, entry: TocEntry) -> bool {
        let Some(local) = entry.local.clone() else {
            self.entries.push(entry);
            return true;
        };
        if self.contains(&local) {
            return false;
        }

        let path = source.position_of(&local).unwrap_or_default();
        insert_at(&mut self.entries, &path, entry);
        true
    }
}

fn insert_at(entries: &mut Vec<TocEntry>, path: &[usize], entry: TocEntry) {
    match path {
        [] => entries.push(entry),
        [index] => {
            let at = (*index).min(entries.len());
            entries.insert(at, entry);
        }
        [index, rest @ ..] => match entries.get_mut(*index) {
            Some(parent) if !parent.sections.is_empty() => insert_at(&mut parent.sections, rest, entry),
            _ => entries.push(entry),
        },
    }
}

/// Source title → target title for entries at the same position with the same page
pub fn title_mappings(source: &Toctree, target: &Toctree) -> HashMap<String, String> {
    fn pair(source: &TocEntry, target: &TocEntry, mappings: &mut HashMap<String, String>) {
        if let (Some(source_local), Some(target_local)) = (&source.local, &target.local) {
            if source_local == target_local {
                if let (Some(source_title), Some(target_title)) = (&source.title, &target.title) {
                    if !source_title.is_empty() && !target_title.is_empty() {
                        mappings.insert(source_title.clone(), target_title.clone());
                    }
                }
            }
        }

        for (source_sub, target_sub) in source.sections.iter().zip(&target.sections) {
            pair(source_sub, target_sub, mappings);
        }
    }

    let mut mappings = HashMap::new();
    for (source_entry, target_entry) in source.entries.iter().zip(&target.entries) {
        pair(source_entry, target_entry, &mut mappings);
    }
    mappings
}

/// First H1 of a page, without its `[[anchor]]`
pub fn first_heading_title(markdown: &str) -> Option<String> {
    let captures = H1_REGEX.captures(markdown)?;
    let title = ANCHOR_SUFFIX_REGEX.replace(&captures[1], "").trim().to_string();
    (!title.is_empty()).then_some(title)
}

/// `local` key of a page path (`main_classes/model.md` → `main_classes/model`)
pub fn local_key(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    normalized
        .strip_suffix(".mdx")
        .or_else(|| normalized.strip_suffix(".md"))
        .unwrap_or(&normalized)
        .to_string()
}

/// Build the toctree entry for a translated page
pub fn entry_for(source: &Toctree, target: &Toctree, relative_path: &str, translated: &str) -> TocEntry {
    let local = local_key(relative_path);
    let source_title = source.find(&local).and_then(|entry| entry.title.clone());

    let mapped = source_title
        .as_ref()
        .and_then(|title| title_mappings(source, target).get(title).cloned());

    let title = mapped
        .or_else(|| first_heading_title(translated))
        .or(source_title)
        .unwrap_or_else(|| local.clone());

    TocEntry::page(local, title)
}

/// Locations of the toctrees involved in registering one page
#[derive(Debug, Clone)]
pub struct TocPaths<'a> {
    /// Source language toctree in the checkout
    pub source: &'a Path,
    /// Target language toctree in the checkout
    pub target: &'a Path,
    /// Target language toctree in the output tree
    pub output: &'a Path,
}

/// Add a translated page to the output toctree.
///
/// The output toctree is updated in place when it exists, otherwise it starts
/// from the checkout's target toctree. Returns the inserted entry, or `None`
/// when the source toctree is missing or the page is already listed.
pub fn register_page(paths: &TocPaths<'_>, relative_path: &str, translated: &str) -> Result<Option<TocEntry>> {
    let Some(source) = Toctree::load(paths.source)? else {
        debug!("No source toctree at {}", paths.source.display());
        return Ok(None);
    };

    let mut target = match Toctree::load(paths.output)? {
        Some(toctree) => toctree,
        None => Toctree::load(paths.target)?.unwrap_or_default(),
    };

    let entry = entry_for(&source, &target, relative_path, translated);
    if !target.insert_like(&source, entry.clone()) {
        debug!("{} is already in the toctree", relative_path);
        return Ok(None);
    }

    FileManager::write_to_file(paths.output, &target.to_yaml()?)?;
    info!(
        "Added '{}' to {}",
        entry.title.as_deref().unwrap_or_default(),
        paths.output.display()
    );
    Ok(Some(entry))
}
