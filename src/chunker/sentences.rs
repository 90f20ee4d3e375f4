//! Sentence splitting and the size-bounded sentence chunker.

use super::{MIN_CHUNK_SIZE, OVERLAP_WORDS};

/// Whitespace as understood by the sentence splitter.
fn is_break_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Split after `.`, `!` or `?` when followed by whitespace.
///
/// The whitespace run after the punctuation is dropped; whitespace anywhere
/// else stays inside its sentence. Empty pieces are never returned.
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if is_break_space(c) && matches!(prev, Some('.' | '!' | '?')) {
            if start < i {
                sentences.push(&text[start..i]);
            }
            let mut end = i + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !is_break_space(next) {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// The last [`OVERLAP_WORDS`] space-separated words of `chunk`.
pub fn overlap_text(chunk: &str) -> String {
    let words: Vec<&str> = chunk.split(' ').collect();
    let from = words.len().saturating_sub(OVERLAP_WORDS);
    words[from..].join(" ")
}

/// Pack sentences into chunks of at most `max_size` bytes.
///
/// A chunk is only closed once it is larger than [`MIN_CHUNK_SIZE`], so a
/// single oversized sentence can exceed the budget. Each new chunk starts
/// with the tail words of the one before it.
pub fn chunk_by_size(content: &str, max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_into_sentences(content) {
        if current.len() + sentence.len() > max_size && current.len() > MIN_CHUNK_SIZE {
            chunks.push(current.trim().to_string());
            let overlap = overlap_text(&current);
            current = format!("{overlap} {sentence}");
        } else {
            current.push(' ');
            current.push_str(sentence);
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        chunks.push(tail.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::DEFAULT_CHUNK_SIZE;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_into_sentences("One. Two!  Three?\nFour"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_into_sentences("No break.here"), vec!["No break.here"]);
        assert!(split_into_sentences("").is_empty());
        assert_eq!(split_into_sentences("End. "), vec!["End."]);
    }

    #[test]
    fn test_small_content_single_chunk() {
        let chunks = chunk_by_size("  A short text. With two sentences.  ", DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks, vec!["A short text. With two sentences.".to_string()]);
        assert!(chunk_by_size("", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_size_bound_and_overlap() {
        let text = (0..200)
            .map(|i| format!("Sentence number {i} talks about permissions."))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = chunk_by_size(&text, 1000);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let prev: Vec<&str> = pair[0].split_whitespace().collect();
            let next: Vec<&str> = pair[1].split_whitespace().collect();
            let tail = &prev[prev.len() - OVERLAP_WORDS..];
            assert_eq!(&next[..OVERLAP_WORDS], tail);
        }

        for chunk in &chunks {
            assert!(chunk.len() <= 1000 + 200, "chunk too large: {}", chunk.len());
        }
    }

    #[test]
    fn test_overlap_text_short_input() {
        assert_eq!(overlap_text("a b c"), "a b c");
    }
}
