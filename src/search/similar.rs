//! "More like this" search: keyword extraction plus word-set similarity.

use super::sort_desc;
use crate::state::DocumentationIndex;
use crate::types::ChunkMetadata;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"));

/// Words never used as keywords.
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by",
];

/// Keywords taken from the reference text.
pub const MAX_KEYWORDS: usize = 10;

/// Upper bound on candidate chunks fetched for a similarity search.
pub const MAX_SIMILAR_CANDIDATES: usize = 40;

/// Share of the combined score given to word-set similarity.
pub const SIMILARITY_WEIGHT: f64 = 0.6;

/// Share of the combined score given to the keyword search score.
pub const SEARCH_SCORE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarHit {
    pub chunk_id: String,
    pub sdk: String,
    pub similarity_score: f64,
    pub search_score: f64,
    pub combined_score: f64,
    pub preview: String,
    pub metadata: ChunkMetadata,
}

/// Lower-cased word tokens of `text`.
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    NON_WORD
        .split(text)
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Up to [`MAX_KEYWORDS`] content words of `text`, first occurrence order.
///
/// Words of two bytes or less and [`STOP_WORDS`] are skipped. The cap is
/// applied before duplicates are removed.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    words(text)
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .take(MAX_KEYWORDS)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Jaccard index of the word sets of two texts; 0.0 when both are empty.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = words(a).collect();
    let b: HashSet<String> = words(b).collect();

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

impl DocumentationIndex {
    /// Chunks whose previews share vocabulary with `reference_text`.
    ///
    /// Candidates come from a keyword search over the reference text's
    /// keywords; those with a similarity below `min_score` are dropped and
    /// the rest are ranked by a blend of similarity and search score.
    pub fn find_similar(
        &self,
        reference_text: &str,
        sdk: Option<&str>,
        limit: usize,
        min_score: f64,
    ) -> Vec<SimilarHit> {
        let keywords = extract_keywords(reference_text);
        if keywords.is_empty() {
            return Vec::new();
        }

        let query = keywords.join(" ");
        let candidates = limit.saturating_mul(2).min(MAX_SIMILAR_CANDIDATES);

        let mut hits: Vec<SimilarHit> = self
            .search_chunks(&query, sdk, candidates)
            .into_iter()
            .filter_map(|result| {
                let similarity = jaccard_similarity(reference_text, &result.preview);
                if similarity < min_score {
                    return None;
                }
                Some(SimilarHit {
                    combined_score: similarity * SIMILARITY_WEIGHT
                        + result.score * SEARCH_SCORE_WEIGHT,
                    chunk_id: result.chunk_id,
                    sdk: result.sdk,
                    similarity_score: similarity,
                    search_score: result.score,
                    preview: result.preview,
                    metadata: result.metadata,
                })
            })
            .collect();

        hits.sort_by(|a, b| sort_desc(a.combined_score, b.combined_score));
        hits.truncate(limit);
        hits
    }
}
