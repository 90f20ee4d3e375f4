//! Parser for generated SDK reference documents (`{LANG}_SDK.md`).
//!
//! Recognised structure:
//!
//! ```text
//! > Compiled from: ...            provenance, kept in the chunk
//! > Generated: ...                provenance, kept in the chunk
//! ## Section                      opens a section
//! <!-- Source: src/Client.php --> opens a source block
//! ### ClientInterface             opens a class (source blocks only)
//! ##### check                     opens a method (inside a class)
//! <!-- End of src/Client.php -->  closes the block, class and method
//! ```
//!
//! Every structural marker flushes the buffered lines under the context that
//! was active before it, and is itself dropped from the chunk content.

use super::{DocParser, flush};
use crate::builder::IndexBuilder;
use crate::markdown;
use crate::types::{ChunkContext, DocKind};

#[derive(Debug, Default)]
struct ParseState<'a> {
    section: Option<&'a str>,
    class: Option<&'a str>,
    method: Option<&'a str>,
    in_source_block: bool,
}

impl<'a> ParseState<'a> {
    fn context(&self) -> ChunkContext<'a> {
        ChunkContext {
            section: self.section,
            class: self.class,
            method: self.method,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SdkReferenceParser;

impl SdkReferenceParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocParser for SdkReferenceParser {
    fn kind(&self) -> DocKind {
        DocKind::Sdk
    }

    fn parse(&self, source: &str, key: &str, builder: &mut IndexBuilder) {
        let limit = builder.chunk_line_limit();
        let mut state = ParseState::default();
        let mut buffer: Vec<&str> = Vec::new();

        for (idx, line) in source.split('\n').enumerate() {
            let line_number = idx + 1;

            if let Some(value) = markdown::compiled_from(line) {
                builder.set_source(key, value);
            }
            if let Some(value) = markdown::generated(line) {
                builder.set_generated(key, value);
            }

            if markdown::source_open(line).is_some() {
                flush(builder, key, &mut buffer, state.context());
                state.in_source_block = true;
                continue;
            }

            if markdown::is_source_end(line) {
                flush(builder, key, &mut buffer, state.context());
                state.in_source_block = false;
                state.class = None;
                state.method = None;
                continue;
            }

            if let Some(name) = markdown::header_at(line, 2) {
                flush(builder, key, &mut buffer, state.context());
                let name = name.trim();
                builder.open_section(key, name, line_number);
                state.section = Some(name);
                continue;
            }

            if state.in_source_block {
                if let Some(name) = markdown::header_at(line, 3) {
                    flush(builder, key, &mut buffer, state.context());
                    let name = name.trim();
                    builder.open_class(key, name);
                    state.class = Some(name);
                    state.method = None;
                    continue;
                }
            }

            if let Some(class) = state.class {
                if let Some(name) = markdown::header_at(line, 5) {
                    flush(builder, key, &mut buffer, state.context());
                    let name = name.trim();
                    builder.open_method(key, class, name);
                    state.method = Some(name);
                    continue;
                }
            }

            buffer.push(line);
            if buffer.len() >= limit {
                flush(builder, key, &mut buffer, state.context());
            }
        }

        flush(builder, key, &mut buffer, state.context());
    }
}
