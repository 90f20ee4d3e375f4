//! Size-bounded chunking that keeps code fences whole and carries header
//! context across chunk boundaries.

use super::{DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE, chunk_by_size};
use crate::markdown;
use serde::Serialize;
use std::borrow::Cow;

/// Options for [`smart_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartChunkOptions {
    /// Byte budget per chunk.
    pub max_size: usize,
    /// Re-open a chunk cut inside a section with `"{header} (continued)"`.
    pub preserve_headers: bool,
    /// Return [`SmartChunk::WithMetadata`] instead of bare strings.
    pub include_metadata: bool,
}

impl Default for SmartChunkOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_CHUNK_SIZE,
            preserve_headers: true,
            include_metadata: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartChunkMetadata {
    /// Most recent header seen before the chunk was closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_level: Option<usize>,
    pub size: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SmartChunk {
    Plain(String),
    WithMetadata {
        content: String,
        metadata: SmartChunkMetadata,
    },
}

impl SmartChunk {
    pub fn content(&self) -> &str {
        match self {
            Self::Plain(content) => content,
            Self::WithMetadata { content, .. } => content,
        }
    }

    pub fn metadata(&self) -> Option<&SmartChunkMetadata> {
        match self {
            Self::Plain(_) => None,
            Self::WithMetadata { metadata, .. } => Some(metadata),
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveHeader {
    text: String,
    level: usize,
}

fn finalize(
    chunks: &mut Vec<SmartChunk>,
    lines: &[Cow<'_, str>],
    header: Option<&ActiveHeader>,
    include_metadata: bool,
) {
    let content = lines.join("\n");
    if include_metadata {
        let metadata = SmartChunkMetadata {
            header: header.map(|h| h.text.clone()),
            header_level: header.map(|h| h.level),
            size: content.len(),
            line_count: lines.len(),
        };
        chunks.push(SmartChunk::WithMetadata { content, metadata });
    } else {
        chunks.push(SmartChunk::Plain(content));
    }
}

/// Chunk by byte size without cutting inside a fenced code block.
///
/// A header closes the running chunk once it is past [`MIN_CHUNK_SIZE`]. A
/// line longer than `max_size` is split with [`chunk_by_size`]; its last
/// piece seeds the next chunk.
pub fn smart_chunk(content: &str, options: &SmartChunkOptions) -> Vec<SmartChunk> {
    let max_size = options.max_size;
    let include = options.include_metadata;

    let mut chunks = Vec::new();
    let mut current: Vec<Cow<'_, str>> = Vec::new();
    let mut header: Option<ActiveHeader> = None;
    let mut in_code = false;
    let mut size = 0usize;

    for line in content.split('\n') {
        let line_size = line.len();

        if markdown::is_fence_prefix(line) {
            in_code = !in_code;
        }

        if !in_code {
            if let Some((level, text)) = markdown::header(line) {
                if size > MIN_CHUNK_SIZE {
                    finalize(&mut chunks, &current, header.as_ref(), include);
                    current.clear();
                    size = 0;
                }
                header = Some(ActiveHeader {
                    text: text.trim().to_string(),
                    level,
                });
            }
        }

        if line_size > max_size && !in_code {
            if !current.is_empty() {
                finalize(&mut chunks, &current, header.as_ref(), include);
            }

            let mut pieces = chunk_by_size(line, max_size);
            let last = pieces.pop();
            for piece in pieces {
                finalize(&mut chunks, &[Cow::Owned(piece)], header.as_ref(), include);
            }

            current.clear();
            size = 0;
            if let Some(last) = last {
                size = last.len();
                current.push(Cow::Owned(last));
            }
            continue;
        }

        current.push(Cow::Borrowed(line));
        size += line_size;

        if size >= max_size && !in_code {
            finalize(&mut chunks, &current, header.as_ref(), include);
            current.clear();
            size = 0;

            if let (true, Some(h)) = (options.preserve_headers, header.as_ref()) {
                let continued = format!("{} {} (continued)", "#".repeat(h.level), h.text);
                size = continued.len();
                current.push(Cow::Owned(continued));
            }
        }
    }

    if !current.is_empty() {
        finalize(&mut chunks, &current, header.as_ref(), include);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, lines: usize) -> String {
        let mut out = vec![format!("## {title}")];
        for i in 0..lines {
            out.push(format!("Line {i} of {title} explains how relations are checked."));
        }
        out.join("\n")
    }

    #[test]
    fn test_default_options_attach_metadata() {
        let text = format!("{}\n{}", section("First", 60), section("Second", 60));
        let chunks = smart_chunk(&text, &SmartChunkOptions::default());
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            let meta = chunk.metadata().expect("metadata");
            assert_eq!(meta.size, chunk.content().len());
            assert_eq!(meta.line_count, chunk.content().split('\n').count());
        }
    }

    #[test]
    fn test_preserve_headers_emits_continuation() {
        let options = SmartChunkOptions {
            max_size: 600,
            ..Default::default()
        };
        let chunks = smart_chunk(&section("Checks", 40), &options);
        assert!(chunks.len() > 1);
        assert!(chunks[1].content().starts_with("## Checks (continued)"));
        assert_eq!(
            chunks[1].metadata().and_then(|m| m.header.as_deref()),
            Some("Checks")
        );
    }

    #[test]
    fn test_code_blocks_are_not_split() {
        let mut lines = vec!["Intro".to_string(), "```php".to_string()];
        for i in 0..100 {
            lines.push(format!("$client->check($request{i}); // verify access rights"));
        }
        lines.push("```".to_string());
        lines.push("Outro".to_string());
        let options = SmartChunkOptions {
            max_size: 500,
            ..Default::default()
        };
        for chunk in smart_chunk(&lines.join("\n"), &options) {
            let fences = chunk
                .content()
                .split('\n')
                .filter(|l| l.starts_with("```"))
                .count();
            assert_eq!(fences % 2, 0, "fence split across chunks");
        }
    }

    #[test]
    fn test_without_metadata_returns_plain_strings() {
        let options = SmartChunkOptions {
            include_metadata: false,
            ..Default::default()
        };
        let chunks = smart_chunk("# Title\nbody", &options);
        assert_eq!(chunks, vec![SmartChunk::Plain("# Title\nbody".into())]);
    }

    #[test]
    fn test_long_line_is_resplit() {
        let line = (0..300)
            .map(|i| format!("Sentence {i} is here."))
            .collect::<Vec<_>>()
            .join(" ");
        let options = SmartChunkOptions {
            max_size: 1000,
            ..Default::default()
        };
        let chunks = smart_chunk(&line, &options);
        assert!(chunks.len() > 3);
        assert!(chunks.iter().all(|c| c.content().len() <= 1000 + 200));
    }
}
