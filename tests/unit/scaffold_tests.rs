/*!
 * Tests for the scaffold builder
 */

use i18n_agent::translation::document::{PlaceholderMap, Scaffold, ScaffoldPiece, placeholder_token, split_paragraphs};
use i18n_agent::translation::preprocess::extract_translatable;

use crate::common::{SAMPLE_PAGE, SAMPLE_PROSE};

/// Test that the scaffold of the sample page keeps non-prose verbatim
#[test]
fn test_build_withSamplePage_shouldKeepCodeAndTable() {
    let scaffold = Scaffold::build(SAMPLE_PAGE, SAMPLE_PROSE);
    let rendered = scaffold.render();

    assert_eq!(scaffold.placeholder_count(), 4);
    assert!(rendered.starts_with("<!--Copyright 2024"));
    assert!(rendered.contains("```py\nfrom transformers import pipeline\n# Not a heading\n```"));
    assert!(rendered.contains("| Text | `text-generation` |"));
    for i in 0..4 {
        assert!(rendered.contains(&placeholder_token(i)));
    }
}

/// Test the placeholder count invariant over several pages
#[test]
fn test_build_placeholderCount_shouldEqualParagraphCount() {
    let pages = [
        "# Title\n\nHello world.\n\n## Sub\n\nMore text.",
        SAMPLE_PAGE,
        "# A\n\nOne.\n\n```\ncode\n```\n\nTwo.\n\n| x |\n\n## B\n\nThree.\n",
        "<!-- c -->\n# Only heading\n",
    ];

    for page in pages {
        let prose = extract_translatable(page);
        let prose = prose.trim_end();
        let scaffold = Scaffold::build(page, prose);

        assert!(scaffold.unplaced().is_empty(), "page: {:?}", page);
        assert_eq!(scaffold.placeholder_count(), split_paragraphs(prose).len());
    }
}

/// Test the first-occurrence policy with a repeated paragraph
#[test]
fn test_build_withRepeatedParagraph_shouldOnlyScaffoldFirstInstance() {
    let page = "# Note\n\nSee below.\n\n```\nSee below.\n```\n\n## Note 2\n\nSee below.";
    let prose = "# Note\n\nSee below.\n\n## Note 2\n\nSee below.";
    let scaffold = Scaffold::build(page, prose);

    // Paragraph 3 finds the copy inside the code block first
    assert_eq!(
        scaffold.render(),
        "placeholder_0\n\nplaceholder_1\n\n```\nplaceholder_3\n```\n\nplaceholder_2\n\nSee below."
    );
}

/// Test slot order in document order
#[test]
fn test_pieces_shouldAlternateLiteralsAndSlots() {
    let scaffold = Scaffold::build("# A\n\nx", "# A\n\nx");
    assert_eq!(
        scaffold.pieces(),
        &[
            ScaffoldPiece::Slot(0),
            ScaffoldPiece::Literal("\n\n".to_string()),
            ScaffoldPiece::Slot(1),
        ]
    );
}

/// Test filling every slot
#[test]
fn test_fill_withAllEntries_shouldSubstituteInOrder() {
    let scaffold = Scaffold::build("# A\n\n```\nc\n```\n\nx", "# A\n\nx");
    let map: PlaceholderMap = [(0, "# 가".to_string()), (1, "나".to_string())].into_iter().collect();
    assert_eq!(scaffold.fill(&map).unwrap(), "# 가\n\n```\nc\n```\n\n나");
}
