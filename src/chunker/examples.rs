//! Code example extraction.

use super::{PLAINTEXT, split_into_sentences};
use crate::markdown;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Example|Usage|Sample|Code):\s*(.+)$").expect("valid regex")
});

/// Number of lines before a fence scanned for a description.
const DESCRIPTION_LOOKBACK: usize = 5;

/// A fenced code block together with the prose that introduces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    pub language: String,
    /// Lines between the fences.
    pub code: String,
    pub description: String,
    /// 1-based line of the opening fence.
    pub line_number: usize,
}

/// Collect every terminated fenced block in `content`.
pub fn extract_code_examples(content: &str) -> Vec<CodeExample> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut examples = Vec::new();
    let mut open: Option<(String, String, usize)> = None;
    let mut code: Vec<&str> = Vec::new();

    for (i, &line) in lines.iter().enumerate() {
        let Some(lang) = markdown::fence_language(line) else {
            if open.is_some() {
                code.push(line);
            }
            continue;
        };

        match open.take() {
            Some((language, preceding, line_number)) => {
                examples.push(CodeExample {
                    language,
                    code: code.join("\n"),
                    description: extract_description(&preceding),
                    line_number,
                });
                code.clear();
            }
            None => {
                let language = if lang.is_empty() { PLAINTEXT } else { lang };
                open = Some((
                    language.to_string(),
                    preceding_text(&lines, i, DESCRIPTION_LOOKBACK),
                    i + 1,
                ));
            }
        }
    }

    examples
}

/// Non-blank lines among the `lookback` lines before `index`, space-joined.
fn preceding_text(lines: &[&str], index: usize, lookback: usize) -> String {
    let start = index.saturating_sub(lookback);
    lines[start..index]
        .iter()
        .filter(|l| !l.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_description(text: &str) -> String {
    let text = text.trim();

    if let Some(m) = LABELLED.captures(text).and_then(|c| c.get(1)) {
        return m.as_str().trim().to_string();
    }

    split_into_sentences(text)
        .last()
        .map(|s| s.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_languages_and_lines() {
        let text = "# Setup\nInstall it first. Then create a client.\n```php\n$client = new Client();\n```\n\nExample: checking access\n```javascript\nconsole.log(check());\n```";
        let examples = extract_code_examples(text);
        assert_eq!(examples.len(), 2);

        assert_eq!(examples[0].language, "php");
        assert_eq!(examples[0].code, "$client = new Client();");
        assert_eq!(examples[0].line_number, 3);
        assert_eq!(examples[0].description, "Then create a client.");

        assert_eq!(examples[1].language, "javascript");
        assert_eq!(examples[1].description, "checking access");
        assert!(examples[0].line_number < examples[1].line_number);
    }

    #[test]
    fn test_untagged_and_unterminated() {
        let examples = extract_code_examples("```\nplain\n```\n```go\nnever closed");
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].language, PLAINTEXT);
        assert_eq!(examples[0].description, "");

        assert!(extract_code_examples("").is_empty());
        assert!(extract_code_examples("no code at all").is_empty());
    }
}
