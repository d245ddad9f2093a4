/*!
 * Mock translation services and scripted model answers for tests
 */

use i18n_agent::providers::mock::{MockProvider, MockRequest};
use i18n_agent::translation::{DocumentPipeline, ReassemblyPolicy, TranslationService};

/// Pipeline translating into Korean through the given mock
pub fn mock_pipeline(mock: MockProvider) -> DocumentPipeline {
    mock_pipeline_with_policy(mock, ReassemblyPolicy::default())
}

/// Pipeline with an explicit reassembly policy
pub fn mock_pipeline_with_policy(mock: MockProvider, policy: ReassemblyPolicy) -> DocumentPipeline {
    DocumentPipeline::new(TranslationService::with_mock(mock), "Korean", policy)
}

/// Answer that wraps the second heading of the prose in a code fence
pub fn fence_second_heading(request: &MockRequest) -> String {
    let mut seen = 0;
    request
        .prose()
        .split("\n\n")
        .map(|paragraph| {
            if paragraph.starts_with('#') {
                seen += 1;
                if seen == 2 {
                    return format!("```\n{}\n```", paragraph);
                }
            }
            paragraph.to_string()
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Answer with only a heading, whatever the prose
pub fn heading_only(_request: &MockRequest) -> String {
    "# 제목".to_string()
}
