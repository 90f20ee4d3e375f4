//! Text segmentation strategies.
//!
//! Every function here is a pure function over a raw string. Lines are split
//! at `\n` and joined back with `\n`; a chunk boundary never falls inside a
//! line. Each strategy cuts at different places:
//!
//! - [`chunk_by_code_blocks`]: fenced code vs. prose
//! - [`chunk_by_headers`]: ATX headers
//! - [`chunk_by_lines`]: fixed windows with a 10-line overlap
//! - [`chunk_by_size`]: byte budget over sentences with a 20-word overlap
//! - [`chunk_by_source_blocks`]: `<!-- Source: X -->` delimited regions
//! - [`smart_chunk`]: byte budget that respects code fences and headers

mod examples;
mod sentences;
mod smart;

pub use examples::{CodeExample, extract_code_examples};
pub use sentences::{chunk_by_size, overlap_text, split_into_sentences};
pub use smart::{SmartChunk, SmartChunkMetadata, SmartChunkOptions, smart_chunk};

use crate::markdown;
use serde::Serialize;

/// Default byte budget for size-based strategies.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;
/// A size-based chunk is never closed while it is this small.
pub const MIN_CHUNK_SIZE: usize = 500;
/// Default window for [`chunk_by_lines`].
pub const DEFAULT_MAX_LINES: usize = 100;
/// Lines carried into the next window by [`chunk_by_lines`].
pub const LINE_OVERLAP: usize = 10;
/// Words carried into the next chunk by [`chunk_by_size`].
pub const OVERLAP_WORDS: usize = 20;
/// Prose runs in [`chunk_by_code_blocks`] are cut at this many lines.
pub const TEXT_BUFFER_LIMIT: usize = 50;

/// Language recorded for fences without a tag.
pub const PLAINTEXT: &str = "plaintext";

// ============================================================================
// By code block
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlockChunk {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Fence language for code chunks, `None` for prose.
    pub language: Option<String>,
    pub content: String,
}

impl CodeBlockChunk {
    fn text(lines: &[&str]) -> Self {
        Self {
            kind: BlockKind::Text,
            language: None,
            content: lines.join("\n"),
        }
    }
}

/// Separate fenced code (fences included) from the prose around it.
///
/// Prose is flushed when a fence opens or after [`TEXT_BUFFER_LIMIT`] lines.
/// An unterminated fence is flushed as code at end of input.
pub fn chunk_by_code_blocks(content: &str) -> Vec<CodeBlockChunk> {
    let mut chunks = Vec::new();
    let mut code: Vec<&str> = Vec::new();
    let mut text: Vec<&str> = Vec::new();
    let mut in_code = false;
    let mut language: Option<String> = None;

    for line in content.split('\n') {
        if let Some(lang) = markdown::fence_language(line) {
            if in_code {
                code.push(line);
                chunks.push(CodeBlockChunk {
                    kind: BlockKind::Code,
                    language: language.take(),
                    content: code.join("\n"),
                });
                code.clear();
                in_code = false;
            } else {
                if !text.is_empty() {
                    chunks.push(CodeBlockChunk::text(&text));
                    text.clear();
                }
                let lang = if lang.is_empty() { PLAINTEXT } else { lang };
                in_code = true;
                language = Some(lang.to_string());
                code.push(line);
            }
        } else if in_code {
            code.push(line);
        } else {
            text.push(line);
            if text.len() >= TEXT_BUFFER_LIMIT {
                chunks.push(CodeBlockChunk::text(&text));
                text.clear();
            }
        }
    }

    if !text.is_empty() {
        chunks.push(CodeBlockChunk::text(&text));
    }

    if !code.is_empty() {
        chunks.push(CodeBlockChunk {
            kind: if in_code {
                BlockKind::Code
            } else {
                BlockKind::Text
            },
            language,
            content: code.join("\n"),
        });
    }

    chunks
}

// ============================================================================
// By header
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderChunk {
    /// Trimmed header text, `None` for content before the first header.
    pub header: Option<String>,
    pub content: String,
    /// Number of `#`, 0 before the first header.
    pub level: usize,
}

/// Split before every `#`..`######` header; the header line opens its chunk.
pub fn chunk_by_headers(content: &str) -> Vec<HeaderChunk> {
    if content.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut header: Option<String> = None;
    let mut level = 0;

    for line in content.split('\n') {
        if let Some((next_level, text)) = markdown::header(line) {
            if !current.is_empty() {
                chunks.push(HeaderChunk {
                    header: header.take(),
                    content: current.join("\n"),
                    level,
                });
                current.clear();
            }
            header = Some(text.trim().to_string());
            level = next_level;
        }
        current.push(line);
    }

    // Non-empty input always leaves at least one line buffered.
    chunks.push(HeaderChunk {
        header,
        content: current.join("\n"),
        level,
    });

    chunks
}

// ============================================================================
// By line count
// ============================================================================

/// Fixed windows of `max_lines` lines; the last [`LINE_OVERLAP`] lines of each
/// window seed the next one.
pub fn chunk_by_lines(content: &str, max_lines: usize) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        current.push(line);

        if current.len() >= max_lines {
            chunks.push(current.join("\n"));
            let keep = current.len().saturating_sub(LINE_OVERLAP);
            current.drain(..keep);
        }
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

// ============================================================================
// By source block
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceBlockKind {
    /// Between `<!-- Source: X -->` and `<!-- End of ... -->`.
    SourceBlock,
    /// Outside any delimiter pair.
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceChunk {
    /// The open block's `X`, or the last one seen for general content.
    pub source: Option<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: SourceBlockKind,
}

/// Split on source-block delimiters. Delimiter lines are not kept.
pub fn chunk_by_source_blocks(content: &str) -> Vec<SourceChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_block = false;
    let mut source: Option<String> = None;

    let mut flush = |current: &mut Vec<&str>, in_block: bool, source: &Option<String>| {
        if current.is_empty() {
            return;
        }
        chunks.push(SourceChunk {
            source: source.clone(),
            content: current.join("\n"),
            kind: if in_block {
                SourceBlockKind::SourceBlock
            } else {
                SourceBlockKind::General
            },
        });
        current.clear();
    };

    for line in content.split('\n') {
        if let Some(file) = markdown::source_open(line) {
            flush(&mut current, in_block, &source);
            in_block = true;
            source = Some(file.to_string());
            continue;
        }

        if markdown::is_source_end(line) {
            flush(&mut current, in_block, &source);
            in_block = false;
            continue;
        }

        current.push(line);
    }

    flush(&mut current, in_block, &source);
    chunks
}
