//! Structural parsers that turn documentation files into chunks.
//!
//! Each parser makes a single pass over the lines of a document, tracks the
//! structural context (section, class, method) and hands every flushed
//! buffer to the [`IndexBuilder`].

pub mod guide;
pub mod sdk;

use crate::builder::IndexBuilder;
use crate::types::{ChunkContext, DocKind};

pub use guide::{GuideParser, clean_section_name};
pub use sdk::SdkReferenceParser;

/// Trait for document-kind specific parsers.
pub trait DocParser: Send + Sync {
    /// The document kind this parser understands.
    fn kind(&self) -> DocKind;

    /// Parse `source` into chunks owned by the document registered as `key`.
    fn parse(&self, source: &str, key: &str, builder: &mut IndexBuilder);
}

/// Get the parser for a document kind.
pub fn parser_for(kind: DocKind) -> Box<dyn DocParser> {
    match kind {
        DocKind::Sdk => Box::new(SdkReferenceParser::new()),
        DocKind::Guide => Box::new(GuideParser::new()),
    }
}

/// Flush a non-empty line buffer into a chunk and clear it.
pub(crate) fn flush(
    builder: &mut IndexBuilder,
    key: &str,
    buffer: &mut Vec<&str>,
    context: ChunkContext<'_>,
) {
    if buffer.is_empty() {
        return;
    }
    builder.create_chunk(key, buffer, context);
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for_matches_kind() {
        for kind in [DocKind::Sdk, DocKind::Guide] {
            assert_eq!(parser_for(kind).kind(), kind);
        }
    }
}
