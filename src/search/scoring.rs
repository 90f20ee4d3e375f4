//! Keyword relevance scoring and preview windows.
//!
//! Matching is ASCII case-insensitive. Lower-casing only ASCII keeps byte
//! offsets identical between a chunk and its lower-cased copy, so a match
//! position can be used to slice the original content.

use crate::types::ChunkMetadata;

/// Bytes of context kept before the match in a preview.
pub const PREVIEW_LEAD: usize = 50;

/// Preview window length, counted from the match.
pub const PREVIEW_LENGTH: usize = 200;

/// Weights for each scored field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelevanceWeights {
    /// Per occurrence of a term in the content
    pub term: f64,
    pub class: f64,
    pub method: f64,
    pub section: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            term: 1.0,
            class: 5.0,
            method: 3.0,
            section: 2.0,
        }
    }
}

/// Terms of an already lower-cased query: split on single spaces, empties dropped.
pub fn query_terms(query_lower: &str) -> impl Iterator<Item = &str> {
    query_lower.split(' ').filter(|term| !term.is_empty())
}

/// Score a chunk against a lower-cased query.
///
/// Each term adds its non-overlapping occurrence count in `content_lower`,
/// plus a bonus for every metadata field that contains it.
pub fn calculate_relevance_score(
    query_lower: &str,
    content_lower: &str,
    metadata: &ChunkMetadata,
    weights: &RelevanceWeights,
) -> f64 {
    let class = lowered(metadata.class.as_deref());
    let method = lowered(metadata.method.as_deref());
    let section = lowered(metadata.section.as_deref());

    let mut score = 0.0;
    for term in query_terms(query_lower) {
        score += weights.term * content_lower.matches(term).count() as f64;

        if contains(&class, term) {
            score += weights.class;
        }
        if contains(&method, term) {
            score += weights.method;
        }
        if contains(&section, term) {
            score += weights.section;
        }
    }
    score
}

fn lowered(value: Option<&str>) -> Option<String> {
    value.map(str::to_ascii_lowercase)
}

fn contains(field: &Option<String>, term: &str) -> bool {
    field.as_deref().is_some_and(|value| value.contains(term))
}

/// A window of `content` around the first match of `query`.
///
/// The window starts [`PREVIEW_LEAD`] bytes before the match of the whole
/// query, or of its first matching term, or at the start of the content.
/// It is widened to character boundaries and marked with `...` on each side
/// that was cut.
pub fn generate_preview(content: &str, query: &str, length: usize) -> String {
    let content_lower = content.to_ascii_lowercase();
    let query_lower = query.to_ascii_lowercase();

    let position = content_lower
        .find(&query_lower)
        .or_else(|| query_terms(&query_lower).find_map(|term| content_lower.find(term)))
        .unwrap_or(0);

    let start = floor_boundary(content, position.saturating_sub(PREVIEW_LEAD));
    let end = ceil_boundary(content, (position + length).min(content.len()));
    let window = &content[start..end];

    let mut preview = String::with_capacity(window.len() + 6);
    let window = if start > 0 {
        preview.push_str("...");
        window.trim_start()
    } else {
        window
    };

    if end < content.len() {
        preview.push_str(window.trim_end());
        preview.push_str("...");
    } else {
        preview.push_str(window);
    }
    preview
}

fn floor_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(section: Option<&str>, class: Option<&str>, method: Option<&str>) -> ChunkMetadata {
        ChunkMetadata {
            section: section.map(String::from),
            class: class.map(String::from),
            method: method.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_score_counts_occurrences_and_bonuses() {
        let weights = RelevanceWeights::default();
        let meta = metadata(Some("Client Setup"), Some("ClientInterface"), Some("check"));

        let score = calculate_relevance_score("client check", "client client check", &meta, &weights);
        // client: 2 + class 5 + section 2; check: 1 + method 3
        assert_eq!(score, 13.0);
    }

    #[test]
    fn test_score_ignores_empty_terms() {
        let weights = RelevanceWeights::default();
        let meta = ChunkMetadata::default();
        assert_eq!(calculate_relevance_score("  tuple  ", "a tuple", &meta, &weights), 1.0);
        assert_eq!(calculate_relevance_score("", "anything", &meta, &weights), 0.0);
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        let weights = RelevanceWeights::default();
        let meta = ChunkMetadata::default();
        assert_eq!(calculate_relevance_score("aa", "aaaa", &meta, &weights), 2.0);
    }

    #[test]
    fn test_preview_short_content_unchanged() {
        assert_eq!(generate_preview("Short text", "text", PREVIEW_LENGTH), "Short text");
    }

    #[test]
    fn test_preview_windows_long_content() {
        let content = format!("{}needle{}", "x".repeat(300), "y".repeat(300));
        let preview = generate_preview(&content, "NEEDLE", PREVIEW_LENGTH);
        assert!(preview.starts_with("..."));
        assert!(preview.ends_with("..."));
        assert!(preview.contains("needle"));
        assert_eq!(preview.len(), 3 + PREVIEW_LEAD + PREVIEW_LENGTH + 3);
    }

    #[test]
    fn test_preview_falls_back_to_term_then_start() {
        let content = format!("{}relation tuple{}", "a".repeat(100), "b".repeat(400));
        let by_term = generate_preview(&content, "missing tuple", PREVIEW_LENGTH);
        assert!(by_term.starts_with("..."));
        assert!(by_term.contains("tuple"));

        let from_start = generate_preview(&content, "absent", PREVIEW_LENGTH);
        assert!(!from_start.starts_with("..."));
        assert!(from_start.ends_with("..."));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let content = "é".repeat(400);
        let preview = generate_preview(&content, "ée", PREVIEW_LENGTH);
        assert!(preview.ends_with("..."));
    }
}
