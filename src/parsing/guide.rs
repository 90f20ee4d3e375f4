//! Parser for prose guides (`OPENFGA_DOCS.md`, `AUTHORING_OPENFGA_MODELS.md`).
//!
//! Only `##` and `###` headers carry structure here. A header closes the
//! running chunk and becomes the first line of the next one.

use super::{DocParser, flush};
use crate::builder::IndexBuilder;
use crate::markdown;
use crate::types::{ChunkContext, DocKind};
use regex::Regex;
use std::sync::LazyLock;

/// Replacement text for the `<ProductName .../>` placeholder component.
pub const PRODUCT_NAME: &str = "OpenFGA";

static PRODUCT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ProductName[^>]*/>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^\s>][^>]*>").expect("valid regex"));
static BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{[^}]*\}\s*").expect("valid regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Turn raw header text into a readable section name.
///
/// Falls back to the raw text stripped of markup characters, then to
/// `"Section {line_number}"`.
pub fn clean_section_name(raw: &str, line_number: usize) -> String {
    let original = raw.trim();

    let name = PRODUCT_TAG.replace_all(original, PRODUCT_NAME);
    let name = TAG.replace_all(&name, "");
    let name = BRACES.replace_all(&name, " ");
    let name = name.replace(['<', '>'], "");
    let name = SPACES.replace_all(&name, " ").trim().to_string();
    if !name.is_empty() {
        return name;
    }

    let fallback = original.replace(['<', '>', '{', '}', '/'], "");
    let fallback = fallback.trim();
    if !fallback.is_empty() {
        return fallback.to_string();
    }

    format!("Section {line_number}")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GuideParser;

impl GuideParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocParser for GuideParser {
    fn kind(&self) -> DocKind {
        DocKind::Guide
    }

    fn parse(&self, source: &str, key: &str, builder: &mut IndexBuilder) {
        let limit = builder.chunk_line_limit();
        let mut section: Option<String> = None;
        let mut buffer: Vec<&str> = Vec::new();

        for (idx, line) in source.split('\n').enumerate() {
            let line_number = idx + 1;

            let structural = markdown::header(line).filter(|&(level, _)| level == 2 || level == 3);
            if let Some((_, raw)) = structural {
                flush(builder, key, &mut buffer, section_context(section.as_deref()));
                let name = clean_section_name(raw, line_number);
                builder.open_section(key, &name, line_number);
                section = Some(name);
            }

            buffer.push(line);
            if buffer.len() >= limit {
                flush(builder, key, &mut buffer, section_context(section.as_deref()));
            }
        }

        flush(builder, key, &mut buffer, section_context(section.as_deref()));
    }
}

fn section_context(section: Option<&str>) -> ChunkContext<'_> {
    ChunkContext {
        section,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::discovery::DocFile;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_clean_section_name() {
        assert_eq!(
            clean_section_name(" What is <ProductName format={ProductNameFormat.ShortForm}/>? ", 3),
            "What is OpenFGA?"
        );
        assert_eq!(clean_section_name("Using <code>check</code> calls", 1), "Using check calls");
        assert_eq!(clean_section_name("Relations {#relations}", 1), "Relations");
        assert_eq!(clean_section_name("a < b", 1), "a b");
        assert_eq!(clean_section_name("<Tabs/>", 1), "Tabs");
        assert_eq!(clean_section_name("{}", 12), "Section 12");
    }

    #[test]
    fn test_headers_start_new_chunks() {
        let doc = "# Guide\nIntro text\n## Modeling <ProductName/>\nBody one\n### Details\nBody two\n#### Deep\nStill two";
        let config = IndexConfig::default();
        let mut builder = IndexBuilder::new(&config);
        builder.register(&DocFile {
            kind: DocKind::Guide,
            key: "general".into(),
            name: "OpenFGA Documentation".into(),
            path: PathBuf::from("OPENFGA_DOCS.md"),
        });
        GuideParser::new().parse(doc, "general", &mut builder);
        let index = builder.finish();

        let chunks: Vec<(&str, Option<&str>)> = index
            .chunks()
            .map(|c| (c.content.as_str(), c.metadata.section.as_deref()))
            .collect();
        assert_eq!(
            chunks,
            vec![
                ("# Guide\nIntro text", None),
                ("## Modeling <ProductName/>\nBody one", Some("Modeling OpenFGA")),
                ("### Details\nBody two\n#### Deep\nStill two", Some("Details")),
            ]
        );

        let entry = index.sdk_entry("general").unwrap();
        assert_eq!(entry.sections.get("Details").unwrap().line_start, 5);
        assert!(entry.classes.is_empty());
    }
}
