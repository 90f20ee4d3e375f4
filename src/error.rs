//! Error types for index construction.
//!
//! Only building the index can fail. Lookups that find nothing return
//! `None` or an empty list instead of an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Documentation directory not found: {}", path.display())]
    DocsDirNotFound { path: PathBuf },

    #[error("Failed to scan documentation directory {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid documentation file pattern: {0}")]
    Pattern(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
