//! Index configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that overrides [`IndexConfig::docs_dir`].
pub const DOCS_PATH_ENV: &str = "DOCS_INDEX_PATH";

/// Default documentation directory, relative to the working directory.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// A parser buffer is force-flushed once it holds this many lines.
pub const CHUNK_SIZE_LIMIT: usize = 5000;

/// Settings consumed by [`DocumentationIndex::build`](crate::DocumentationIndex::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Directory holding the `*.md` reference files.
    pub docs_dir: PathBuf,
    /// Maximum number of lines buffered before a chunk is forced.
    pub chunk_line_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            chunk_line_limit: CHUNK_SIZE_LIMIT,
        }
    }
}

impl IndexConfig {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self::default().with_docs_dir(docs_dir)
    }

    /// Default settings, with `docs_dir` taken from `DOCS_INDEX_PATH` when set.
    pub fn from_env() -> Self {
        Self::from_docs_var(std::env::var_os(DOCS_PATH_ENV))
    }

    fn from_docs_var(value: Option<OsString>) -> Self {
        match value {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    pub fn with_docs_dir(mut self, docs_dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = docs_dir.into();
        self
    }

    /// Override the forced-flush line count. Zero is treated as one.
    pub fn with_chunk_line_limit(mut self, limit: usize) -> Self {
        self.chunk_line_limit = limit.max(1);
        self
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }
}
