//! Documentation file discovery.
//!
//! Lists the Markdown files of the docs directory and classifies them by
//! file name into SDK references and the two prose guides.

use crate::error::{IndexError, Result};
use crate::types::DocKind;
use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static SDK_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)_SDK\.md$").expect("valid regex"));

/// File name of the model authoring guide.
pub const AUTHORING_FILE: &str = "AUTHORING_OPENFGA_MODELS.md";
/// File name of the general product documentation.
pub const GENERAL_FILE: &str = "OPENFGA_DOCS.md";

/// A recognised documentation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFile {
    pub kind: DocKind,
    /// Lower-cased index key (`php`, `go`, `general`, `authoring`).
    pub key: String,
    /// Display name (`PHP SDK`, `Model Authoring Guide`, ...).
    pub name: String,
    pub path: PathBuf,
}

/// Discovers documentation files in a directory (non-recursive).
pub struct DocDiscovery {
    /// Glob applied to file names
    pattern: String,
}

impl Default for DocDiscovery {
    fn default() -> Self {
        Self {
            pattern: "*.md".to_string(),
        }
    }
}

impl DocDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the file name glob.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    /// List every file matching the glob, sorted by file name.
    pub fn list(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(IndexError::DocsDirNotFound {
                path: root.to_path_buf(),
            });
        }

        let matcher = build_matcher(&self.pattern)?;
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| IndexError::Scan {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if matcher.is_match(entry.file_name()) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// List and classify; unrecognised file names are dropped.
    pub fn discover(&self, root: &Path) -> Result<Vec<DocFile>> {
        let files = self.list(root)?;
        let total = files.len();
        let docs: Vec<DocFile> = files.into_iter().filter_map(classify).collect();
        tracing::debug!(
            "Recognised {} of {} markdown files in {}",
            docs.len(),
            total,
            root.display()
        );
        Ok(docs)
    }
}

/// Classify a documentation file by its file name.
pub fn classify(path: PathBuf) -> Option<DocFile> {
    let file_name = path.file_name()?.to_str()?;

    if let Some(caps) = SDK_FILE.captures(file_name) {
        let lang = &caps[1];
        return Some(DocFile {
            kind: DocKind::Sdk,
            key: lang.to_lowercase(),
            name: format!("{lang} SDK"),
            path,
        });
    }

    let (key, name) = match file_name {
        AUTHORING_FILE => ("authoring", "Model Authoring Guide"),
        GENERAL_FILE => ("general", "OpenFGA Documentation"),
        _ => return None,
    };

    Some(DocFile {
        kind: DocKind::Guide,
        key: key.to_string(),
        name: name.to_string(),
        path,
    })
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher> {
    Ok(Glob::new(pattern)?.compile_matcher())
}
