//! Search modes that regroup keyword hits by class, method, section or
//! code example.

use super::sort_desc;
use crate::chunker::extract_code_examples;
use crate::state::DocumentationIndex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Upper bound on candidate chunks fetched for a code example search.
pub const MAX_CODE_EXAMPLE_CANDIDATES: usize = 20;

/// Class name used for method hits outside any class.
pub const UNKNOWN_CLASS: &str = "Unknown";

/// Language tags treated as the same language.
const LANGUAGE_ALIASES: &[&[&str]] = &[
    &["php"],
    &["go", "golang"],
    &["python", "py"],
    &["java"],
    &["csharp", "cs", "c#"],
    &["javascript", "js"],
    &["typescript", "ts"],
    &["bash", "shell", "sh"],
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassHit {
    pub class_name: String,
    pub sdk: String,
    pub relevance_score: f64,
    pub section: Option<String>,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodHit {
    pub method_name: String,
    pub class_name: String,
    pub sdk: String,
    pub relevance_score: f64,
    pub section: Option<String>,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionHit {
    pub section_name: String,
    pub sdk: String,
    pub relevance_score: f64,
    /// Number of matching chunks in the section.
    pub chunk_count: usize,
    /// Preview of the best-ranked chunk.
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeExampleHit {
    pub sdk: String,
    pub chunk_id: String,
    pub language: String,
    pub code: String,
    pub description: String,
    /// Line of the opening fence within the chunk.
    pub line_number: usize,
    /// Score of the chunk the example came from.
    pub relevance_score: f64,
    pub section: Option<String>,
    pub class: Option<String>,
    pub method: Option<String>,
}

/// Whether a fence language tag satisfies a language filter.
pub fn language_matches(detected: &str, filter: &str) -> bool {
    let detected = detected.to_ascii_lowercase();
    let filter = filter.to_ascii_lowercase();

    let aliased = LANGUAGE_ALIASES
        .iter()
        .any(|group| group.contains(&detected.as_str()) && group.contains(&filter.as_str()));
    aliased || detected == filter
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

impl DocumentationIndex {
    /// Classes whose chunks match `query`, best chunk per `(sdk, class)`.
    pub fn search_classes(&self, query: &str, sdk: Option<&str>, limit: usize) -> Vec<ClassHit> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut hits = Vec::new();

        for result in self.search_chunks(query, sdk, limit.saturating_mul(2)) {
            let Some(class) = non_empty(result.metadata.class.as_ref()) else {
                continue;
            };
            // Results arrive best first, so the first hit per class is its best.
            if !seen.insert((result.sdk.clone(), class.clone())) {
                continue;
            }
            hits.push(ClassHit {
                class_name: class.clone(),
                sdk: result.sdk,
                relevance_score: result.score,
                section: result.metadata.section,
                preview: result.preview,
            });
        }

        hits.sort_by(|a, b| sort_desc(a.relevance_score, b.relevance_score));
        hits.truncate(limit);
        hits
    }

    /// Method chunks matching `query`. Every matching chunk is its own hit.
    pub fn search_methods(&self, query: &str, sdk: Option<&str>, limit: usize) -> Vec<MethodHit> {
        let mut hits: Vec<MethodHit> = self
            .search_chunks(query, sdk, limit.saturating_mul(2))
            .into_iter()
            .filter_map(|result| {
                let method = non_empty(result.metadata.method.as_ref())?.clone();
                let class = result
                    .metadata
                    .class
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CLASS.to_string());
                Some(MethodHit {
                    method_name: method,
                    class_name: class,
                    sdk: result.sdk,
                    relevance_score: result.score,
                    section: result.metadata.section,
                    preview: result.preview,
                })
            })
            .collect();

        hits.sort_by(|a, b| sort_desc(a.relevance_score, b.relevance_score));
        hits.truncate(limit);
        hits
    }

    /// Sections containing matching chunks, grouped by `(sdk, section)`.
    pub fn search_sections(&self, query: &str, sdk: Option<&str>, limit: usize) -> Vec<SectionHit> {
        let mut groups: HashMap<(String, String), usize> = HashMap::new();
        let mut hits: Vec<SectionHit> = Vec::new();

        for result in self.search_chunks(query, sdk, limit.saturating_mul(2)) {
            let Some(section) = non_empty(result.metadata.section.as_ref()) else {
                continue;
            };
            let key = (result.sdk.clone(), section.clone());

            match groups.get(&key) {
                Some(&idx) => {
                    let hit = &mut hits[idx];
                    hit.chunk_count += 1;
                    hit.relevance_score = hit.relevance_score.max(result.score);
                }
                None => {
                    groups.insert(key, hits.len());
                    hits.push(SectionHit {
                        section_name: section.clone(),
                        sdk: result.sdk,
                        relevance_score: result.score,
                        chunk_count: 1,
                        preview: result.preview,
                    });
                }
            }
        }

        hits.sort_by(|a, b| sort_desc(a.relevance_score, b.relevance_score));
        hits.truncate(limit);
        hits
    }

    /// Code examples taken from the chunks that best match `query`.
    ///
    /// `language` keeps only examples whose fence tag matches it, aliases
    /// included (`js` finds `javascript`).
    pub fn search_code_examples(
        &self,
        query: &str,
        language: Option<&str>,
        sdk: Option<&str>,
        limit: usize,
    ) -> Vec<CodeExampleHit> {
        let candidates = limit.min(MAX_CODE_EXAMPLE_CANDIDATES);
        let mut hits = Vec::new();

        for result in self.search_chunks(query, sdk, candidates) {
            let Some(chunk) = self.get_chunk(&result.chunk_id) else {
                continue;
            };

            for example in extract_code_examples(&chunk.content) {
                if language.is_some_and(|filter| !language_matches(&example.language, filter)) {
                    continue;
                }
                hits.push(CodeExampleHit {
                    sdk: result.sdk.clone(),
                    chunk_id: result.chunk_id.clone(),
                    language: example.language,
                    code: example.code,
                    description: example.description,
                    line_number: example.line_number,
                    relevance_score: result.score,
                    section: result.metadata.section.clone(),
                    class: result.metadata.class.clone(),
                    method: result.metadata.method.clone(),
                });
            }
        }

        hits.sort_by(|a, b| sort_desc(a.relevance_score, b.relevance_score));
        hits.truncate(limit);
        hits
    }
}
