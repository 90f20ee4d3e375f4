// Allow some clippy lints that are too strict for our codebase
#![allow(clippy::collapsible_if)]

//! Documentation Index
//!
//! Chunking and keyword search over SDK reference documentation written in
//! Markdown.
//!
//! # Architecture
//!
//! The crate has two independent halves:
//!
//! 1. **Chunker**: pure text segmentation strategies (by code block, header,
//!    line window, byte size, source block, and a fence-aware "smart" mode).
//!
//! 2. **Index**: scans a docs directory, parses each `{LANG}_SDK.md` reference
//!    and the prose guides into chunks tagged with section, class and method,
//!    links neighbouring chunks, and answers lookups and keyword searches.
//!
//! # Usage
//!
//! ```ignore
//! use docs_index::{IndexConfig, IndexHandle};
//!
//! let handle = IndexHandle::new(IndexConfig::from_env());
//! for hit in handle.search_chunks("check permission", Some("php"), 10)? {
//!     println!("{} {:.1} {}", hit.chunk_id, hit.score, hit.preview);
//! }
//! ```

pub mod builder;
pub mod chunker;
pub mod config;
pub mod discovery;
pub mod error;
pub mod markdown;
pub mod parsing;
pub mod search;
pub mod state;
pub mod types;

// Re-exports
pub use builder::IndexBuilder;
pub use chunker::{
    CodeExample, SmartChunk, SmartChunkOptions, chunk_by_code_blocks, chunk_by_headers,
    chunk_by_lines, chunk_by_size, chunk_by_source_blocks, extract_code_examples, smart_chunk,
};
pub use config::IndexConfig;
pub use discovery::{DocDiscovery, DocFile};
pub use error::{IndexError, Result};
pub use search::{ClassHit, CodeExampleHit, MethodHit, RelevanceWeights, SectionHit, SimilarHit};
pub use state::{DocumentationIndex, IndexHandle, IndexStats, SharedIndex, create_index};
pub use types::*;
