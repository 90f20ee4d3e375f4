//! Index construction.
//!
//! The builder owns the chunk table while documents are parsed. Chunk IDs
//! come from one counter shared by every document, so ID numbers increase
//! across the whole index in scan order.

use crate::config::IndexConfig;
use crate::discovery::{DocDiscovery, DocFile};
use crate::error::Result;
use crate::parsing;
use crate::state::DocumentationIndex;
use crate::types::{
    Chunk, ChunkContext, ChunkMetadata, ClassEntry, DocKind, MethodEntry, OrderedMap, SdkEntry,
    SectionEntry,
};
use std::collections::HashMap;

/// Mutable index under construction.
pub struct IndexBuilder {
    chunk_line_limit: usize,
    chunks: Vec<Chunk>,
    chunk_positions: HashMap<String, usize>,
    entries: OrderedMap<SdkEntry>,
    sdk_list: Vec<String>,
}

impl IndexBuilder {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            chunk_line_limit: config.chunk_line_limit,
            chunks: Vec::new(),
            chunk_positions: HashMap::new(),
            entries: OrderedMap::new(),
            sdk_list: Vec::new(),
        }
    }

    /// Scan, parse and link every document under `config.docs_dir`.
    pub fn build(config: &IndexConfig) -> Result<DocumentationIndex> {
        let root = config.docs_dir();
        tracing::info!("Starting documentation index of {}", root.display());

        let docs = DocDiscovery::new().discover(root)?;
        tracing::info!("Discovered {} documentation files", docs.len());

        let mut builder = Self::new(config);
        for doc in &docs {
            builder.add_document(doc);
        }
        builder.link_navigation();

        let index = builder.finish();
        let stats = index.stats();
        tracing::info!(
            "Index complete: {} documents, {} chunks, {} sections, {} classes",
            stats.document_count,
            stats.chunk_count,
            stats.section_count,
            stats.class_count
        );

        Ok(index)
    }

    /// Read and parse one document. Unreadable files and files whose key is
    /// already registered are skipped.
    pub fn add_document(&mut self, doc: &DocFile) {
        let bytes = match std::fs::read(&doc.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", doc.path.display(), e);
                return;
            }
        };
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Invalid UTF-8 in {}, replacing bad bytes", doc.path.display());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        if !self.register(doc) {
            return;
        }
        let before = self.chunks.len();
        parsing::parser_for(doc.kind).parse(&source, &doc.key, self);
        tracing::debug!(
            "Parsed {} ({}): {} chunks",
            doc.path.display(),
            doc.key,
            self.chunks.len() - before
        );
    }

    /// Register the entry for a document. The first registration of a key
    /// wins; returns `false` for a duplicate.
    pub fn register(&mut self, doc: &DocFile) -> bool {
        if self.entries.contains_key(&doc.key) {
            tracing::warn!(
                "Duplicate documentation key {} from {}, keeping first",
                doc.key,
                doc.path.display()
            );
            return false;
        }
        self.entries
            .get_or_insert_with(&doc.key, || SdkEntry::new(&doc.name, doc.kind, doc.path.clone()));
        if doc.kind == DocKind::Sdk {
            self.sdk_list.push(doc.key.clone());
        }
        true
    }

    pub fn chunk_line_limit(&self) -> usize {
        self.chunk_line_limit
    }

    pub fn set_source(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.source = Some(value.to_string());
        }
    }

    pub fn set_generated(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.generated = Some(value.to_string());
        }
    }

    /// Register a section on first sight; a repeated name keeps its first line.
    pub fn open_section(&mut self, key: &str, name: &str, line_start: usize) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.sections.get_or_insert_with(name, || SectionEntry {
                line_start,
                chunks: Vec::new(),
            });
        }
    }

    pub fn open_class(&mut self, key: &str, name: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.classes.get_or_insert_with(name, ClassEntry::default);
        }
    }

    pub fn open_method(&mut self, key: &str, class: &str, name: &str) {
        if let Some(class) = self
            .entries
            .get_mut(key)
            .and_then(|entry| entry.classes.get_mut(class))
        {
            class.methods.get_or_insert_with(name, MethodEntry::default);
        }
    }

    /// Store `lines` as a new chunk of `key` and attach it to its context.
    ///
    /// Returns the new chunk ID.
    pub fn create_chunk(&mut self, key: &str, lines: &[&str], context: ChunkContext<'_>) -> String {
        let content = lines.join("\n");
        let id = format!("{}_chunk_{:06}", key, self.chunks.len());

        if let Some(entry) = self.entries.get_mut(key) {
            entry.chunks.push(id.clone());

            if let Some(section) = context.section.and_then(|s| entry.sections.get_mut(s)) {
                section.chunks.push(id.clone());
            }

            if let Some(class) = context.class.and_then(|c| entry.classes.get_mut(c)) {
                class.chunk_id.get_or_insert_with(|| id.clone());
                if let Some(method) = context.method.and_then(|m| class.methods.get_mut(m)) {
                    method.chunk_id.get_or_insert_with(|| id.clone());
                }
            }
        }

        let metadata = ChunkMetadata {
            section: context.section.map(str::to_string),
            class: context.class.map(str::to_string),
            method: context.method.map(str::to_string),
            line_count: lines.len(),
            size_bytes: content.len(),
        };

        self.chunk_positions.insert(id.clone(), self.chunks.len());
        self.chunks.push(Chunk {
            id: id.clone(),
            sdk: key.to_string(),
            content,
            metadata,
            prev_chunk: None,
            next_chunk: None,
        });

        id
    }

    /// Link each chunk to its neighbours within the same document.
    pub fn link_navigation(&mut self) {
        for (_, entry) in self.entries.iter() {
            for (i, id) in entry.chunks.iter().enumerate() {
                let Some(&pos) = self.chunk_positions.get(id) else {
                    continue;
                };
                let chunk = &mut self.chunks[pos];
                chunk.prev_chunk = i.checked_sub(1).map(|p| entry.chunks[p].clone());
                chunk.next_chunk = entry.chunks.get(i + 1).cloned();
            }
        }
    }

    pub fn finish(self) -> DocumentationIndex {
        DocumentationIndex {
            chunks: self.chunks,
            chunk_positions: self.chunk_positions,
            entries: self.entries,
            sdk_list: self.sdk_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc(key: &str, kind: DocKind) -> DocFile {
        DocFile {
            kind,
            key: key.to_string(),
            name: format!("{} doc", key),
            path: PathBuf::from(format!("{}.md", key)),
        }
    }

    #[test]
    fn test_chunk_ids_use_global_counter() {
        let mut builder = IndexBuilder::new(&IndexConfig::default());
        builder.register(&doc("go", DocKind::Sdk));
        builder.register(&doc("php", DocKind::Sdk));

        let a = builder.create_chunk("go", &["a"], ChunkContext::default());
        let b = builder.create_chunk("php", &["b"], ChunkContext::default());
        let c = builder.create_chunk("go", &["c"], ChunkContext::default());

        assert_eq!(a, "go_chunk_000000");
        assert_eq!(b, "php_chunk_000001");
        assert_eq!(c, "go_chunk_000002");
    }

    #[test]
    fn test_navigation_stays_within_document() {
        let mut builder = IndexBuilder::new(&IndexConfig::default());
        builder.register(&doc("go", DocKind::Sdk));
        builder.register(&doc("php", DocKind::Sdk));
        builder.create_chunk("go", &["a"], ChunkContext::default());
        builder.create_chunk("php", &["b"], ChunkContext::default());
        builder.create_chunk("go", &["c"], ChunkContext::default());
        builder.link_navigation();
        let index = builder.finish();

        let first = index.get_chunk("go_chunk_000000").unwrap();
        assert_eq!(first.prev_chunk, None);
        assert_eq!(first.next_chunk.as_deref(), Some("go_chunk_000002"));

        let lone = index.get_chunk("php_chunk_000001").unwrap();
        assert_eq!(lone.prev_chunk, None);
        assert_eq!(lone.next_chunk, None);

        let last = index.get_chunk("go_chunk_000002").unwrap();
        assert_eq!(last.prev_chunk.as_deref(), Some("go_chunk_000000"));
        assert_eq!(last.next_chunk, None);
    }

    #[test]
    fn test_first_chunk_wins_for_class_and_method() {
        let mut builder = IndexBuilder::new(&IndexConfig::default());
        builder.register(&doc("php", DocKind::Sdk));
        builder.open_section("php", "API", 1);
        builder.open_class("php", "Client");
        builder.open_method("php", "Client", "check");

        let context = ChunkContext {
            section: Some("API"),
            class: Some("Client"),
            method: Some("check"),
        };
        let first = builder.create_chunk("php", &["one", "two"], context);
        builder.create_chunk("php", &["three"], context);
        let index = builder.finish();

        let entry = index.sdk_entry("php").unwrap();
        let class = entry.classes.get("Client").unwrap();
        assert_eq!(class.chunk_id.as_deref(), Some(first.as_str()));
        assert_eq!(
            class.methods.get("check").unwrap().chunk_id.as_deref(),
            Some(first.as_str())
        );
        assert_eq!(entry.sections.get("API").unwrap().chunks.len(), 2);

        let chunk = index.get_chunk(&first).unwrap();
        assert_eq!(chunk.content, "one\ntwo");
        assert_eq!(chunk.metadata.line_count, 2);
        assert_eq!(chunk.metadata.size_bytes, 7);
    }

    #[test]
    fn test_duplicate_key_registers_once() {
        let mut builder = IndexBuilder::new(&IndexConfig::default());
        assert!(builder.register(&doc("general", DocKind::Guide)));

        let mut again = doc("general", DocKind::Sdk);
        again.name = "GENERAL SDK".to_string();
        assert!(!builder.register(&again));

        let index = builder.finish();
        assert_eq!(index.sdk_entry("general").unwrap().name, "general doc");
        assert!(index.get_sdk_list().is_empty());
    }

    #[test]
    fn test_unregistered_section_is_not_tracked() {
        let mut builder = IndexBuilder::new(&IndexConfig::default());
        builder.register(&doc("go", DocKind::Sdk));
        let context = ChunkContext {
            section: Some("Ghost"),
            ..Default::default()
        };
        builder.create_chunk("go", &["x"], context);
        let index = builder.finish();

        assert!(index.sdk_entry("go").unwrap().sections.is_empty());
        assert_eq!(
            index.get_chunk("go_chunk_000000").unwrap().metadata.section.as_deref(),
            Some("Ghost")
        );
    }
}
