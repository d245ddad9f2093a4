/*!
 * Tests for toctree title mapping and entry insertion
 */

use std::path::Path;

use i18n_agent::toctree::{
    TocEntry, TocPaths, Toctree, entry_for, register_page, title_mappings,
};

use crate::common;

const EN_TOCTREE: &str = "\
- sections:
  - local: index
    title: Transformers
  - local: installation
    title: Installation
  - local: quicktour
    title: Quick tour
  title: Get started
- isExpanded: false
  sections:
  - local: main_classes/overview
    title: Overview
  - local: main_classes/model
    title: Models
  title: Main classes
- sections:
  - local: tasks/overview
    title: Overview
  title: Tasks
";

const KO_TOCTREE: &str = "\
- sections:
  - local: index
    title: 🤗 Transformers
  - local: quicktour
    title: 둘러보기
  title: 시작하기
- isExpanded: false
  sections:
  - local: main_classes/overview
    title: 개요
  title: 메인 클래스
";

fn locals(entries: &[TocEntry]) -> Vec<&str> {
    entries.iter().filter_map(|e| e.local.as_deref()).collect()
}

/// Test that titles are paired by position and page
#[test]
fn test_titleMappings_shouldPairSamePagesAtSamePosition() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();
    let ko = Toctree::parse(KO_TOCTREE).unwrap();

    let mappings = title_mappings(&en, &ko);

    assert_eq!(mappings.get("Transformers").map(String::as_str), Some("🤗 Transformers"));
    assert_eq!(mappings.get("Overview").map(String::as_str), Some("개요"));
    // installation sits where quicktour is in ko: different pages, no pair
    assert!(!mappings.contains_key("Installation"));
    assert!(!mappings.contains_key("Quick tour"));
}

/// Test locating entries in nested sections
#[test]
fn test_positionOf_shouldReturnNestedIndexPath() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();

    assert_eq!(en.position_of("quicktour"), Some(vec![0, 2]));
    assert_eq!(en.position_of("main_classes/model"), Some(vec![1, 1]));
    assert_eq!(en.position_of("missing"), None);
    assert_eq!(
        en.find("main_classes/model").and_then(|e| e.title.as_deref()),
        Some("Models")
    );
}

/// Test inserting a page at its source position
#[test]
fn test_insertLike_shouldUseSourcePosition() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();
    let mut ko = Toctree::parse(KO_TOCTREE).unwrap();

    assert!(ko.insert_like(&en, TocEntry::page("installation", "설치")));
    assert_eq!(locals(&ko.entries[0].sections), vec!["index", "installation", "quicktour"]);

    assert!(ko.insert_like(&en, TocEntry::page("main_classes/model", "모델")));
    assert_eq!(
        locals(&ko.entries[1].sections),
        vec!["main_classes/overview", "main_classes/model"]
    );
}

/// Test that an already listed page is not added twice
#[test]
fn test_insertLike_withListedPage_shouldNotDuplicate() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();
    let mut ko = Toctree::parse(KO_TOCTREE).unwrap();

    assert!(!ko.insert_like(&en, TocEntry::page("quicktour", "둘러보기")));
    assert_eq!(ko, Toctree::parse(KO_TOCTREE).unwrap());
}

/// Test the fallback when the target has no matching parent section
#[test]
fn test_insertLike_withMissingParent_shouldAppendTopLevel() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();
    let mut ko = Toctree::parse(KO_TOCTREE).unwrap();

    assert!(ko.insert_like(&en, TocEntry::page("tasks/overview", "개요")));
    assert_eq!(ko.entries.len(), 3);
    assert_eq!(ko.entries[2].local.as_deref(), Some("tasks/overview"));

    let mut empty = Toctree::default();
    assert!(empty.insert_like(&en, TocEntry::page("quicktour", "둘러보기")));
    assert_eq!(locals(&empty.entries), vec!["quicktour"]);
}

/// Test the title chosen for a new entry
#[test]
fn test_entryFor_shouldPreferExistingTitleThenTranslatedHeading() {
    let en = Toctree::parse(EN_TOCTREE).unwrap();
    let ko = Toctree::parse(KO_TOCTREE).unwrap();

    let mapped = entry_for(&en, &ko, "tasks/overview.md", "# 작업 개요 [[overview]]\n\n본문.");
    assert_eq!(mapped, TocEntry::page("tasks/overview", "개요"));

    let from_heading = entry_for(&en, &ko, "installation.md", "# 설치 [[installation]]\n\n본문.");
    assert_eq!(from_heading, TocEntry::page("installation", "설치"));

    let from_source = entry_for(&en, &ko, "main_classes/model.md", "## 부제목만");
    assert_eq!(from_source, TocEntry::page("main_classes/model", "Models"));
}

/// Test that unknown keys survive a round trip
#[test]
fn test_toYaml_shouldKeepUnknownKeys() {
    let ko = Toctree::parse(KO_TOCTREE).unwrap();
    let yaml = ko.to_yaml().unwrap();

    assert!(yaml.contains("isExpanded: false"));
    assert_eq!(Toctree::parse(&yaml).unwrap(), ko);
}

/// Test registering a page writes the output toctree
#[test]
fn test_registerPage_shouldWriteOutputToctree() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_file(dir.path(), "repo/en/_toctree.yml", EN_TOCTREE).unwrap();
    let target = common::create_test_file(dir.path(), "repo/ko/_toctree.yml", KO_TOCTREE).unwrap();
    let output = dir.path().join("out/ko/_toctree.yml");
    let paths = TocPaths {
        source: &source,
        target: &target,
        output: &output,
    };

    let entry = register_page(&paths, "installation.md", "# 설치 [[installation]]").unwrap();
    assert_eq!(entry, Some(TocEntry::page("installation", "설치")));

    // the checkout is untouched, the output starts from it
    assert_eq!(std::fs::read_to_string(&target).unwrap(), KO_TOCTREE);
    let written = Toctree::load(&output).unwrap().unwrap();
    assert_eq!(locals(&written.entries[0].sections), vec!["index", "installation", "quicktour"]);

    // a second page builds on the output toctree
    register_page(&paths, "main_classes/model.md", "# 모델 [[models]]").unwrap();
    let written = Toctree::load(&output).unwrap().unwrap();
    assert!(written.contains("installation"));
    assert!(written.contains("main_classes/model"));

    assert_eq!(register_page(&paths, "installation.md", "# 설치").unwrap(), None);
}

/// Test that nothing is written without a source toctree
#[test]
fn test_registerPage_withoutSourceToctree_shouldSkip() {
    let dir = common::create_temp_dir().unwrap();
    let output = dir.path().join("out/_toctree.yml");
    let paths = TocPaths {
        source: Path::new("/nonexistent/en/_toctree.yml"),
        target: Path::new("/nonexistent/ko/_toctree.yml"),
        output: &output,
    };

    assert_eq!(register_page(&paths, "quicktour.md", "# 둘러보기").unwrap(), None);
    assert!(!output.exists());
}
