/*!
 * Extraction of the translatable prose from a documentation page.
 *
 * License comments before the first heading, fenced code blocks and markdown
 * tables are not sent to the model; they stay in the scaffold verbatim.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```.*?```").expect("Invalid code block regex")
});

static TABLE_ROW_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\|.*\|$\n?").expect("Invalid table row regex")
});

static BLANK_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\n+").expect("Invalid blank line regex")
});

static LICENSE_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex")
});

/// Extract the prose to translate from a raw page.
///
/// Returns an empty string when the page has no heading at all.
pub fn extract_translatable(content: &str) -> String {
    let Some(first_heading) = content.find('#') else {
        return String::new();
    };

    let text = &content[first_heading..];
    let text = CODE_BLOCK_REGEX.replace_all(text, "");
    let text = TABLE_ROW_REGEX.replace_all(&text, "");
    BLANK_RUN_REGEX.replace_all(&text, "\n\n").into_owned()
}

/// Remove the leading license comment, for showing a page to an operator
pub fn strip_license_comment(content: &str) -> String {
    LICENSE_COMMENT_REGEX
        .replacen(content, 1, "")
        .trim()
        .to_string()
}

/// Whether there is anything worth sending to the model
pub fn has_translatable_content(prose: &str) -> bool {
    !prose.trim().is_empty()
}
