//! Keyword search over the chunk table.
//!
//! [`DocumentationIndex::search_chunks`] is the primitive: score every
//! chunk, keep positive scores, rank, truncate. The search modes in
//! [`modes`] and [`similar`] run on top of it and regroup its hits.

pub mod modes;
mod scoring;
pub mod similar;

pub use modes::{ClassHit, CodeExampleHit, MethodHit, SectionHit, language_matches};
pub use scoring::{
    PREVIEW_LEAD, PREVIEW_LENGTH, RelevanceWeights, calculate_relevance_score, generate_preview,
    query_terms,
};
pub use similar::{STOP_WORDS, SimilarHit, extract_keywords, jaccard_similarity};

use crate::state::DocumentationIndex;
use crate::types::SearchResult;
use std::cmp::Ordering;

impl DocumentationIndex {
    /// Rank chunks against `query` with the default weights.
    ///
    /// `sdk` restricts the search to one document key (case-insensitive).
    pub fn search_chunks(&self, query: &str, sdk: Option<&str>, limit: usize) -> Vec<SearchResult> {
        self.search_chunks_with(query, sdk, limit, &RelevanceWeights::default())
    }

    /// Rank chunks against `query` with custom weights.
    ///
    /// Ties keep chunk creation order.
    pub fn search_chunks_with(
        &self,
        query: &str,
        sdk: Option<&str>,
        limit: usize,
        weights: &RelevanceWeights,
    ) -> Vec<SearchResult> {
        if limit == 0 {
            return Vec::new();
        }

        let query_lower = query.to_ascii_lowercase();
        let sdk_filter = sdk.map(str::to_lowercase);

        let mut scored: Vec<(usize, f64)> = self
            .chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| sdk_filter.as_deref().is_none_or(|key| chunk.sdk == key))
            .filter_map(|(pos, chunk)| {
                let content_lower = chunk.content.to_ascii_lowercase();
                let score =
                    calculate_relevance_score(&query_lower, &content_lower, &chunk.metadata, weights);
                (score > 0.0).then_some((pos, score))
            })
            .collect();

        tracing::debug!("Search '{}' matched {} chunks", query, scored.len());

        scored.sort_by(|a, b| sort_desc(a.1, b.1));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(pos, score)| {
                let chunk = &self.chunks[pos];
                SearchResult {
                    chunk_id: chunk.id.clone(),
                    sdk: chunk.sdk.clone(),
                    score,
                    preview: generate_preview(&chunk.content, query, PREVIEW_LENGTH),
                    metadata: chunk.metadata.clone(),
                }
            })
            .collect()
    }
}

/// Descending order for scores; stable sorts keep the order of ties.
pub(crate) fn sort_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
