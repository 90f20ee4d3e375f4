//! Core types for the documentation index.
//!
//! This module defines the data structures shared by the parsers, the index
//! builder and the query layer:
//! - Chunks and their structural metadata
//! - The per-document hierarchy (sections, classes, methods)
//! - Result records handed back to callers

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

// ============================================================================
// Ordered map
// ============================================================================

/// String-keyed map that remembers insertion order.
///
/// Sections and classes are listed in the order the parser discovered them,
/// so lookups go through a position table instead of a plain `HashMap`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    positions: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.positions.get(key).map(|&i| &mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Insert `value` under `key` unless the key already exists.
    ///
    /// Returns the stored value either way; the first insertion wins.
    pub fn get_or_insert_with(&mut self, key: &str, value: impl FnOnce() -> V) -> &mut V {
        let idx = match self.positions.get(key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push((key.to_string(), value()));
                self.positions.insert(key.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ============================================================================
// Chunks
// ============================================================================

/// Structural context that was active when a chunk was closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkMetadata {
    pub section: Option<String>,
    pub class: Option<String>,
    pub method: Option<String>,
    pub line_count: usize,
    pub size_bytes: usize,
}

/// A contiguous span of source lines stored as one retrievable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// `{sdk}_chunk_{000000}`
    pub id: String,
    pub sdk: String,
    /// The covered source lines joined with `\n`, verbatim.
    pub content: String,
    pub metadata: ChunkMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_chunk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_chunk: Option<String>,
}

/// Structural context handed to the builder when a buffer is flushed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkContext<'a> {
    pub section: Option<&'a str>,
    pub class: Option<&'a str>,
    pub method: Option<&'a str>,
}

// ============================================================================
// Document hierarchy
// ============================================================================

/// Kind of scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// A `{LANG}_SDK.md` reference document.
    Sdk,
    /// A prose guide (`general`, `authoring`).
    Guide,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    /// 1-based line of the header that opened the section.
    pub line_start: usize,
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    pub signature: Option<String>,
    pub parameters: Vec<String>,
    pub returns: Option<String>,
    pub chunk_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassEntry {
    pub namespace: Option<String>,
    pub methods: OrderedMap<MethodEntry>,
    pub chunk_id: Option<String>,
}

/// One scanned document: an SDK reference or a synthetic guide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdkEntry {
    pub name: String,
    pub kind: DocKind,
    pub file: PathBuf,
    /// Value of the `> Compiled from:` line, if any.
    pub source: Option<String>,
    /// Value of the `> Generated:` line, if any.
    pub generated: Option<String>,
    pub sections: OrderedMap<SectionEntry>,
    pub classes: OrderedMap<ClassEntry>,
    /// Every chunk of this document in parse order.
    pub chunks: Vec<String>,
}

impl SdkEntry {
    pub fn new(name: impl Into<String>, kind: DocKind, file: PathBuf) -> Self {
        Self {
            name: name.into(),
            kind,
            file,
            source: None,
            generated: None,
            sections: OrderedMap::new(),
            classes: OrderedMap::new(),
            chunks: Vec::new(),
        }
    }
}

// ============================================================================
// Query results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDocumentation {
    pub class: String,
    pub sdk: String,
    pub namespace: Option<String>,
    pub methods: OrderedMap<MethodEntry>,
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDocumentation {
    pub method: String,
    pub class: String,
    pub sdk: String,
    pub signature: Option<String>,
    pub parameters: Vec<String>,
    pub returns: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkOverview {
    pub sdk: String,
    pub name: String,
    pub file: PathBuf,
    pub sections: Vec<String>,
    pub classes: Vec<String>,
    pub total_chunks: usize,
    pub source: Option<String>,
    pub generated: Option<String>,
}

/// One ranked hit from [`search_chunks`](crate::DocumentationIndex::search_chunks).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub chunk_id: String,
    pub sdk: String,
    pub score: f64,
    pub preview: String,
    pub metadata: ChunkMetadata,
}
