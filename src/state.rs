//! The built documentation index and its shared handle.
//!
//! A [`DocumentationIndex`] is immutable once built; every query is a pure
//! read. [`IndexHandle`] wraps it for callers that want lazy construction on
//! first use and the ability to drop and rebuild it.

use crate::builder::IndexBuilder;
use crate::config::IndexConfig;
use crate::error::Result;
use crate::types::*;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Index statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub document_count: usize,
    pub sdk_count: usize,
    pub chunk_count: usize,
    pub section_count: usize,
    pub class_count: usize,
    pub method_count: usize,
}

/// Every chunk of every scanned document plus the per-document hierarchy.
#[derive(Debug, Clone, Default)]
pub struct DocumentationIndex {
    // ========================================================================
    // Chunk table
    // ========================================================================
    /// All chunks in creation order
    pub(crate) chunks: Vec<Chunk>,
    /// Chunk ID -> position in `chunks`
    pub(crate) chunk_positions: HashMap<String, usize>,

    // ========================================================================
    // Document hierarchy
    // ========================================================================
    /// Document key -> entry, in scan order
    pub(crate) entries: OrderedMap<SdkEntry>,
    /// Keys of SDK reference documents, in scan order
    pub(crate) sdk_list: Vec<String>,
}

impl DocumentationIndex {
    /// Scan and parse the configured docs directory.
    pub fn build(config: &IndexConfig) -> Result<Self> {
        IndexBuilder::build(config)
    }

    pub fn get_chunk(&self, chunk_id: &str) -> Option<&Chunk> {
        self.chunk_positions
            .get(chunk_id)
            .and_then(|&pos| self.chunks.get(pos))
    }

    /// All chunks in creation order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Entry for a document key. The key is lower-cased first.
    pub fn sdk_entry(&self, sdk: &str) -> Option<&SdkEntry> {
        self.entries.get(&sdk.to_lowercase())
    }

    /// Chunks of one section in document order; empty when unknown.
    pub fn get_chunks_by_section(&self, sdk: &str, section: &str) -> Vec<&Chunk> {
        let Some(section) = self
            .sdk_entry(sdk)
            .and_then(|entry| entry.sections.get(section))
        else {
            return Vec::new();
        };

        section
            .chunks
            .iter()
            .filter_map(|id| self.get_chunk(id))
            .collect()
    }

    /// A class entry together with the first chunk written inside it.
    pub fn get_class_documentation(&self, sdk: &str, class: &str) -> Option<ClassDocumentation> {
        let key = sdk.to_lowercase();
        let info = self.entries.get(&key)?.classes.get(class)?;
        let chunk = self.get_chunk(info.chunk_id.as_deref()?)?;

        Some(ClassDocumentation {
            class: class.to_string(),
            sdk: key,
            namespace: info.namespace.clone(),
            methods: info.methods.clone(),
            content: chunk.content.clone(),
            metadata: chunk.metadata.clone(),
        })
    }

    pub fn get_method_documentation(
        &self,
        sdk: &str,
        class: &str,
        method: &str,
    ) -> Option<MethodDocumentation> {
        let class_doc = self.get_class_documentation(sdk, class)?;
        let info = class_doc.methods.get(method)?;
        let chunk = self.get_chunk(info.chunk_id.as_deref()?)?;

        Some(MethodDocumentation {
            method: method.to_string(),
            class: class.to_string(),
            sdk: class_doc.sdk.clone(),
            signature: info.signature.clone(),
            parameters: info.parameters.clone(),
            returns: info.returns.clone(),
            content: chunk.content.clone(),
        })
    }

    pub fn get_sdk_overview(&self, sdk: &str) -> Option<SdkOverview> {
        let key = sdk.to_lowercase();
        let entry = self.entries.get(&key)?;

        Some(SdkOverview {
            name: entry.name.clone(),
            file: entry.file.clone(),
            sections: entry.sections.keys().map(str::to_string).collect(),
            classes: entry.classes.keys().map(str::to_string).collect(),
            total_chunks: entry.chunks.len(),
            source: entry.source.clone(),
            generated: entry.generated.clone(),
            sdk: key,
        })
    }

    /// Keys of the `{LANG}_SDK.md` documents in scan order.
    pub fn get_sdk_list(&self) -> &[String] {
        &self.sdk_list
    }

    /// Every indexed document key in scan order, guides included.
    pub fn document_keys(&self) -> Vec<&str> {
        self.entries.keys().collect()
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            document_count: self.entries.len(),
            sdk_count: self.sdk_list.len(),
            chunk_count: self.chunks.len(),
            ..Default::default()
        };
        for (_, entry) in self.entries.iter() {
            stats.section_count += entry.sections.len();
            stats.class_count += entry.classes.len();
            stats.method_count += entry
                .classes
                .iter()
                .map(|(_, class)| class.methods.len())
                .sum::<usize>();
        }
        stats
    }
}

// ============================================================================
// Shared handle
// ============================================================================

/// Lazily built, resettable index shared between callers.
///
/// The first query (or an explicit [`initialize`](Self::initialize)) scans
/// the docs directory. Concurrent first calls are serialized so the scan
/// runs once; a failed scan leaves the handle empty and the next call retries.
pub struct IndexHandle {
    config: IndexConfig,
    index: Mutex<Option<Arc<DocumentationIndex>>>,
}

/// Thread-safe shared handle.
pub type SharedIndex = Arc<IndexHandle>;

/// Create a new shared handle for `config`.
pub fn create_index(config: IndexConfig) -> SharedIndex {
    Arc::new(IndexHandle::new(config))
}

impl IndexHandle {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            index: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Build the index unless it is already built.
    pub fn initialize(&self) -> Result<()> {
        self.index().map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.index.lock().is_some()
    }

    /// Drop the built index; the next call rebuilds it from disk.
    ///
    /// Callers holding an `Arc` from [`index`](Self::index) keep their copy.
    pub fn reset(&self) {
        *self.index.lock() = None;
    }

    /// The built index, building it first if needed.
    pub fn index(&self) -> Result<Arc<DocumentationIndex>> {
        let mut guard = self.index.lock();
        if let Some(index) = guard.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(DocumentationIndex::build(&self.config)?);
        *guard = Some(Arc::clone(&index));
        Ok(index)
    }

    pub fn get_chunk(&self, chunk_id: &str) -> Result<Option<Chunk>> {
        Ok(self.index()?.get_chunk(chunk_id).cloned())
    }

    pub fn get_chunks_by_section(&self, sdk: &str, section: &str) -> Result<Vec<Chunk>> {
        let index = self.index()?;
        Ok(index
            .get_chunks_by_section(sdk, section)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn get_class_documentation(
        &self,
        sdk: &str,
        class: &str,
    ) -> Result<Option<ClassDocumentation>> {
        Ok(self.index()?.get_class_documentation(sdk, class))
    }

    pub fn get_method_documentation(
        &self,
        sdk: &str,
        class: &str,
        method: &str,
    ) -> Result<Option<MethodDocumentation>> {
        Ok(self.index()?.get_method_documentation(sdk, class, method))
    }

    pub fn get_sdk_overview(&self, sdk: &str) -> Result<Option<SdkOverview>> {
        Ok(self.index()?.get_sdk_overview(sdk))
    }

    pub fn get_sdk_list(&self) -> Result<Vec<String>> {
        Ok(self.index()?.get_sdk_list().to_vec())
    }

    pub fn search_chunks(
        &self,
        query: &str,
        sdk: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        Ok(self.index()?.search_chunks(query, sdk, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_docs(dir: &TempDir) {
        fs::write(
            dir.path().join("GO_SDK.md"),
            "## Setup\n<!-- Source: client.go -->\n### Client\nClient docs\n##### Check\nCheck docs\n<!-- End of client.go -->\n",
        )
        .unwrap();
        fs::write(dir.path().join("OPENFGA_DOCS.md"), "## Concepts\nTuples\n").unwrap();
    }

    #[test]
    fn test_lookups() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);
        let index = DocumentationIndex::build(&IndexConfig::new(dir.path())).unwrap();

        assert_eq!(index.get_sdk_list(), ["go".to_string()]);
        assert_eq!(index.document_keys(), vec!["go", "general"]);

        let class = index.get_class_documentation("GO", "Client").unwrap();
        assert_eq!(class.sdk, "go");
        assert_eq!(class.content, "Client docs");
        assert!(class.methods.contains_key("Check"));

        let method = index.get_method_documentation("go", "Client", "Check").unwrap();
        assert_eq!(method.content, "Check docs");
        assert!(index.get_method_documentation("go", "Client", "Missing").is_none());
        assert!(index.get_class_documentation("go", "client").is_none());

        let overview = index.get_sdk_overview("Go").unwrap();
        assert_eq!(overview.name, "GO SDK");
        assert_eq!(overview.sections, vec!["Setup"]);
        assert_eq!(overview.classes, vec!["Client"]);
        assert_eq!(overview.total_chunks, index.sdk_entry("go").unwrap().chunks.len());
        assert!(index.get_sdk_overview("rust").is_none());

        assert!(index.get_chunks_by_section("go", "Nope").is_empty());
        assert!(index.get_chunks_by_section("ruby", "Setup").is_empty());
        assert_eq!(index.get_chunks_by_section("general", "Concepts").len(), 1);
    }

    #[test]
    fn test_stats() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);
        let index = DocumentationIndex::build(&IndexConfig::new(dir.path())).unwrap();
        let stats = index.stats();

        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.sdk_count, 1);
        assert_eq!(stats.class_count, 1);
        assert_eq!(stats.method_count, 1);
        assert_eq!(stats.section_count, 2);
        assert_eq!(stats.chunk_count, index.chunk_count());
    }

    #[test]
    fn test_handle_lazy_init_and_reset() {
        let dir = TempDir::new().unwrap();
        write_docs(&dir);
        let handle = IndexHandle::new(IndexConfig::new(dir.path()));

        assert!(!handle.is_initialized());
        assert_eq!(handle.get_sdk_list().unwrap(), vec!["go".to_string()]);
        assert!(handle.is_initialized());

        let first = handle.index().unwrap();
        handle.initialize().unwrap();
        assert!(Arc::ptr_eq(&first, &handle.index().unwrap()));

        fs::write(dir.path().join("PHP_SDK.md"), "## Intro\ntext\n").unwrap();
        assert_eq!(handle.get_sdk_list().unwrap(), vec!["go".to_string()]);

        handle.reset();
        assert!(!handle.is_initialized());
        assert_eq!(
            handle.get_sdk_list().unwrap(),
            vec!["go".to_string(), "php".to_string()]
        );
        assert_eq!(first.get_sdk_list(), ["go".to_string()]);
    }

    #[test]
    fn test_handle_failed_init_retries() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        let handle = IndexHandle::new(IndexConfig::new(&docs));

        assert!(handle.initialize().is_err());
        assert!(!handle.is_initialized());

        fs::create_dir(&docs).unwrap();
        handle.initialize().unwrap();
        assert!(handle.is_initialized());
        assert!(handle.get_sdk_list().unwrap().is_empty());
    }
}
