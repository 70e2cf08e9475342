//! Recursive boundary-aware text chunking with overlap
//!
//! Text is split on the largest separator present (paragraph, line, sentence,
//! word); only pieces that are still too large descend to the next separator,
//! and the empty separator finally cuts between grapheme clusters. Small
//! pieces are then merged back up to `chunk_size`, carrying up to
//! `chunk_overlap` characters of trailing context into the next chunk.

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, ChunkSource, PageText};

/// Separators tried in order, largest boundary first
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
    separators: Vec<String>,
}

impl TextChunker {
    /// Create a new chunker with the default separators
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap: overlap.min(chunk_size.saturating_sub(1)),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Chunk every page of a document
    ///
    /// Pages are split independently so each chunk maps to exactly one page.
    pub fn chunk_pages(&self, document_key: &str, pages: &[PageText]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            for content in self.split_text(&page.text) {
                let source = ChunkSource {
                    document_key: document_key.to_string(),
                    page_number: Some(page.page_number),
                };
                chunks.push(Chunk::new(chunks.len() as u32, content, source));
            }
        }

        chunks
    }

    /// Split text into chunks of at most `chunk_size` characters
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Largest separator actually present in the text
        let mut separator = "";
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                remaining = &[];
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    final_chunks.push(trimmed.to_string());
                }
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedily merge small pieces into chunks, keeping a tail window as overlap
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join_pieces(&current) {
                    docs.push(doc);
                }

                // Drop pieces from the front until what is left fits as overlap
                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    match current.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1000, 100)
    }
}

/// Split on `separator`, attaching each separator to the start of the piece
/// that follows it; the empty separator splits into grapheme clusters
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text.graphemes(true).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut search_from = 0;

    while let Some(pos) = text[search_from..].find(separator) {
        let at = search_from + pos;
        if at > start {
            pieces.push(&text[start..at]);
        }
        start = at;
        search_from = at + separator.len();
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(100, 10);
        assert_eq!(chunker.split_text("  Hello world.  "), vec!["Hello world."]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let chunker = TextChunker::new(100, 10);
        assert!(chunker.split_text("").is_empty());
        assert!(chunker.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunker = TextChunker::new(30, 0);
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = chunker.split_text(text);
        assert_eq!(chunks, vec!["First paragraph here.", "Second paragraph here."]);
    }

    #[test]
    fn test_descends_to_words_only_when_needed() {
        let chunker = TextChunker::new(20, 0);
        let text = "short para\n\nthis paragraph is definitely longer than twenty";
        let chunks = chunker.split_text(text);

        assert_eq!(chunks[0], "short para");
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
        assert_eq!(
            chunks[1..].join(" "),
            "this paragraph is definitely longer than twenty"
        );
    }

    #[test]
    fn test_hard_cut_for_unbroken_text() {
        let chunker = TextChunker::new(10, 0);
        let text = "a".repeat(35);
        let chunks = chunker.split_text(&text);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let chunker = TextChunker::new(30, 12);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        let chunks = chunker.split_text(text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let last_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].contains(last_word),
                "{:?} should carry overlap from {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_multibyte_text_respects_char_budget() {
        let chunker = TextChunker::new(8, 2);
        let text = "żółć gęślą jaźń über naïve café";
        for chunk in chunker.split_text(text) {
            assert!(chunk.chars().count() <= 8, "chunk too long: {:?}", chunk);
        }
    }

    #[test]
    fn test_chunk_pages_tracks_pages_and_indices() {
        let chunker = TextChunker::new(20, 0);
        let pages = vec![
            PageText::new(1, "page one text.\n\nmore page one."),
            PageText::new(2, ""),
            PageText::new(3, "page three."),
        ];

        let chunks = chunker.chunk_pages("report.pdf", &pages);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].source.page_number, Some(1));
        assert_eq!(chunks[1].source.page_number, Some(1));
        assert_eq!(chunks[2].source.page_number, Some(3));
        assert_eq!(chunks[2].source.document_key, "report.pdf");
        let indices: Vec<u32> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_bounded_and_deterministic(
            text in "[a-z .\n]{0,400}",
            chunk_size in 5usize..80,
            overlap_pct in 0usize..50,
        ) {
            let overlap = chunk_size * overlap_pct / 100;
            let chunker = TextChunker::new(chunk_size, overlap);

            let first = chunker.split_text(&text);
            let second = chunker.split_text(&text);
            prop_assert_eq!(&first, &second);

            for chunk in &first {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.chars().count() <= chunk_size);
            }
        }
    }
}
