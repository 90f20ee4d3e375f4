//! Line classifiers for the Markdown constructs the chunkers and parsers
//! react to: fences, headers, source-block delimiters and provenance notes.

use regex::Regex;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```([A-Za-z0-9_]*)$").expect("valid regex"));
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6}) (.+)$").expect("valid regex"));
static SOURCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!-- Source: (.+) -->$").expect("valid regex"));
static SOURCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!-- End of .+ -->$").expect("valid regex"));
static COMPILED_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^> Compiled from: (.+)$").expect("valid regex"));
static GENERATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^> Generated: (.+)$").expect("valid regex"));

/// Language tag of a fence line (```` ```lang ```` or ```` ``` ````).
///
/// Returns `Some("")` for a bare fence.
pub fn fence_language(line: &str) -> Option<&str> {
    FENCE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Any line starting with three backticks toggles code state in smart chunking.
pub fn is_fence_prefix(line: &str) -> bool {
    line.starts_with("```")
}

/// `(level, text)` of an ATX header line; `text` is untrimmed.
pub fn header(line: &str) -> Option<(usize, &str)> {
    let caps = HEADER.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    Some((level, text))
}

/// Header text when `line` is a header of exactly `level`.
pub fn header_at(line: &str, level: usize) -> Option<&str> {
    match header(line) {
        Some((l, text)) if l == level => Some(text),
        _ => None,
    }
}

/// Trimmed `X` of a `<!-- Source: X -->` line.
pub fn source_open(line: &str) -> Option<&str> {
    SOURCE_OPEN
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// `<!-- End of ... -->`
pub fn is_source_end(line: &str) -> bool {
    SOURCE_END.is_match(line)
}

pub fn compiled_from(line: &str) -> Option<&str> {
    COMPILED_FROM
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

pub fn generated(line: &str) -> Option<&str> {
    GENERATED
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("```php"), Some("php"));
        assert_eq!(fence_language("```"), Some(""));
        assert_eq!(fence_language("``` php"), None);
        assert_eq!(fence_language("text ```"), None);
    }

    #[test]
    fn test_header_levels() {
        assert_eq!(header("# Title"), Some((1, "Title")));
        assert_eq!(header("###### Deep"), Some((6, "Deep")));
        assert_eq!(header("####### Too deep"), None);
        assert_eq!(header("##NoSpace"), None);
        assert_eq!(header("## "), None);
        assert_eq!(header_at("### Class", 3), Some("Class"));
        assert_eq!(header_at("### Class", 2), None);
    }

    #[test]
    fn test_source_markers() {
        assert_eq!(
            source_open("<!-- Source: src/Client.php  -->"),
            Some("src/Client.php")
        );
        assert!(is_source_end("<!-- End of src/Client.php -->"));
        assert!(!is_source_end("<!-- End of -->"));
    }

    #[test]
    fn test_provenance() {
        assert_eq!(
            compiled_from("> Compiled from: openfga/php-sdk "),
            Some("openfga/php-sdk")
        );
        assert_eq!(generated("> Generated: 2024-01-01"), Some("2024-01-01"));
        assert_eq!(generated(">Generated: x"), None);
    }
}
