/*!
 * Integration tests translating whole pages through the mock provider
 */

use i18n_agent::errors::{ReassemblyError, TranslationError};
use i18n_agent::providers::mock::MockProvider;
use i18n_agent::translation::{Diagnostic, ReassemblyPolicy};

use crate::common::SAMPLE_PAGE;
use crate::common::mock_providers::{fence_second_heading, heading_only, mock_pipeline, mock_pipeline_with_policy};

const CODE_BLOCK: &str = "```py\nfrom transformers import pipeline\n# Not a heading\n```";
const TABLE: &str = "| Task | Pipeline |\n|------|----------|\n| Text | `text-generation` |";

/// Test that an untranslated answer reproduces the page with anchors
#[tokio::test]
async fn test_translateDocument_withIdentity_shouldReproducePageWithAnchors() {
    let out = mock_pipeline(MockProvider::identity())
        .translate_document(SAMPLE_PAGE)
        .await
        .unwrap();

    let expected = SAMPLE_PAGE
        .replace("# Quick tour\n", "# Quick tour [[quick-tour]]\n")
        .replace("## Pipeline\n", "## Pipeline [[pipeline]]\n");
    assert_eq!(out.document, expected);
    assert!(out.diagnostics.is_empty());
}

/// Test a translated page keeps code, tables and the license comment
#[tokio::test]
async fn test_translateDocument_withWorkingProvider_shouldTranslateOnlyProse() {
    let out = mock_pipeline(MockProvider::working())
        .translate_document(SAMPLE_PAGE)
        .await
        .unwrap();

    assert!(out.document.starts_with("<!--Copyright 2024 The HuggingFace Team."));
    assert!(out.document.contains("# [번역] Quick tour [[quick-tour]]\n\n[번역] Get up and running with the library."));
    assert!(out.document.contains(CODE_BLOCK));
    assert!(out.document.contains(TABLE));
    assert!(out.document.contains("## [번역] Pipeline [[pipeline]]\n\n[번역] The pipeline is the easiest way to use a model.\n"));
    assert_eq!(out.usage.provider, "Mock");
}

/// Test that an answer echoed inside a markdown fence is unwrapped
#[tokio::test]
async fn test_translateDocument_withFencedAnswer_shouldMatchUnfencedResult() {
    let fenced = mock_pipeline(MockProvider::fenced())
        .translate_document(SAMPLE_PAGE)
        .await
        .unwrap();
    let plain = mock_pipeline(MockProvider::working())
        .translate_document(SAMPLE_PAGE)
        .await
        .unwrap();

    assert_eq!(fenced.document, plain.document);
}

/// Test that a heading the model put in a code fence gets no anchor
#[tokio::test]
async fn test_translateDocument_withFencedHeading_shouldNotAnchorIt() {
    let mock = MockProvider::identity().with_custom_response(fence_second_heading);
    let out = mock_pipeline(mock).translate_document(SAMPLE_PAGE).await.unwrap();

    assert!(out.document.contains("```\n## Pipeline\n```"));
    assert!(!out.document.contains("[[pipeline]]"));
    assert!(out.document.contains("# Quick tour [[quick-tour]]"));
    assert_eq!(
        out.diagnostics,
        vec![Diagnostic::FencedHeading {
            index: 1,
            title: "Pipeline".to_string()
        }]
    );
}

/// Test a lost heading within the drift budget
#[tokio::test]
async fn test_translateDocument_withLostHeading_shouldReportDrift() {
    let out = mock_pipeline(MockProvider::drop_last_heading())
        .translate_document(SAMPLE_PAGE)
        .await
        .unwrap();

    assert_eq!(
        out.diagnostics,
        vec![
            Diagnostic::HeaderDrift { expected: 2, found: 1 },
            Diagnostic::ParagraphDrift { expected: 4, found: 3 },
        ]
    );
    assert!(out.document.contains("# [번역] Quick tour [[quick-tour]]"));
    assert!(!out.document.contains("[[pipeline]]"));
    assert!(out.document.contains(CODE_BLOCK));
}

/// Test the same loss under the strict policy
#[tokio::test]
async fn test_translateDocument_withLostHeadingStrict_shouldFail() {
    let result = mock_pipeline_with_policy(MockProvider::drop_last_heading(), ReassemblyPolicy::strict())
        .translate_document(SAMPLE_PAGE)
        .await;

    assert!(matches!(
        result,
        Err(TranslationError::Reassembly(ReassemblyError::SectionCountMismatch { expected: 4, found: 3 }))
    ));
}

/// Test that collapsed paragraphs are fatal
#[tokio::test]
async fn test_translateDocument_withMergedParagraphs_shouldFail() {
    let result = mock_pipeline(MockProvider::merge_paragraphs())
        .translate_document(SAMPLE_PAGE)
        .await;

    match result {
        Err(TranslationError::Reassembly(error)) => {
            assert_eq!(error, ReassemblyError::SectionCountMismatch { expected: 4, found: 1 });
            assert!(error.to_string().contains("recover 3"));
        }
        other => panic!("Expected a reassembly error, got {:?}", other.map(|t| t.document)),
    }
}

/// Test that a single-heading answer is fatal
#[tokio::test]
async fn test_translateDocument_withHeadingOnlyAnswer_shouldFail() {
    let mock = MockProvider::identity().with_custom_response(heading_only);
    let result = mock_pipeline(mock).translate_document(SAMPLE_PAGE).await;

    assert!(matches!(
        result,
        Err(TranslationError::Reassembly(ReassemblyError::SectionCountMismatch { expected: 4, found: 1 }))
    ));
}

/// Test provider failures and empty answers
#[tokio::test]
async fn test_translateDocument_withFailingOrEmptyProvider_shouldFail() {
    let failing = mock_pipeline(MockProvider::failing()).translate_document(SAMPLE_PAGE).await;
    assert!(matches!(failing, Err(TranslationError::Provider(_))));

    let empty = mock_pipeline(MockProvider::empty()).translate_document(SAMPLE_PAGE).await;
    assert!(matches!(
        empty,
        Err(TranslationError::Reassembly(ReassemblyError::SectionCountMismatch { found: 0, .. }))
    ));
}

/// Test that pages without prose never reach the model
#[tokio::test]
async fn test_translateDocument_withoutProse_shouldNotCallModel() {
    let mock = MockProvider::working();
    let pipeline = mock_pipeline(mock.clone());

    let result = pipeline.translate_document("<!-- only a comment -->\n").await;
    assert!(matches!(result, Err(TranslationError::SourceContent(_))));
    assert_eq!(mock.request_count(), 0);

    pipeline.translate_document(SAMPLE_PAGE).await.unwrap();
    assert_eq!(mock.request_count(), 1);
}

/// Test the prompt sent for the sample page
#[test]
fn test_promptFor_withCustomInstructions_shouldContainProseOnly() {
    let pipeline = mock_pipeline(MockProvider::identity()).with_custom_instructions("Keep 'pipeline' in English.");
    let document = pipeline.prepare(SAMPLE_PAGE).unwrap();
    let prompt = pipeline.prompt_for(&document);

    assert!(prompt.contains("mean in Korean?"));
    assert!(prompt.contains("Keep 'pipeline' in English."));
    assert!(!prompt.contains("Not a heading"));
    assert!(!prompt.contains("text-generation"));
    assert_eq!(document.anchors(), &["[[quick-tour]]", "[[pipeline]]"]);
    assert_eq!(document.scaffold().placeholder_count(), 4);
}
