//! Overlapping fixed-size windows over large documents

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use scriptmind_domain::Chunk;

/// Default window size (characters)
pub const DEFAULT_WINDOW: usize = 6000;

/// Default overlap between consecutive windows (characters)
pub const DEFAULT_OVERLAP: usize = 500;

/// Default distance searched backwards for a line break (characters)
pub const DEFAULT_NEWLINE_SEARCH: usize = 200;

/// Splits a document into overlapping windows, preferring line boundaries
///
/// All sizes and offsets are in characters, so a window never splits a
/// multi-byte character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    window: usize,
    overlap: usize,
    newline_search: usize,
}

impl Chunker {
    /// Create a chunker; requires `0 < overlap < window`
    pub fn new(window: usize, overlap: usize) -> Result<Self, ExtractorError> {
        if window == 0 {
            return Err(ExtractorError::InvalidConfiguration(
                "chunk window must be greater than 0".to_string(),
            ));
        }
        if overlap == 0 || overlap >= window {
            return Err(ExtractorError::InvalidConfiguration(format!(
                "chunk overlap must satisfy 0 < overlap < window (overlap {}, window {})",
                overlap, window
            )));
        }
        Ok(Self {
            window,
            overlap,
            newline_search: DEFAULT_NEWLINE_SEARCH,
        })
    }

    /// Create a chunker from pipeline configuration
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Ok(Self::new(config.chunk_size, config.chunk_overlap)?
            .with_newline_search(config.newline_search_window))
    }

    /// Set how far back from a window edge to look for a line break
    pub fn with_newline_search(mut self, newline_search: usize) -> Self {
        self.newline_search = newline_search;
        self
    }

    /// Window size in characters
    pub fn window(&self) -> usize {
        self.window
    }

    /// Overlap in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk the given document
    ///
    /// A document no longer than the window (including the empty document)
    /// yields exactly one chunk equal to the whole document.
    pub fn chunk<'a>(&self, document: &'a str) -> Vec<Chunk<'a>> {
        // Byte offset of every character, plus the end of the document
        let offsets: Vec<usize> = document
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(document.len()))
            .collect();
        let total = offsets.len() - 1;

        if total <= self.window {
            return vec![Chunk {
                index: 0,
                start: 0,
                end: total,
                text: document,
            }];
        }

        let mut chunks = Vec::with_capacity(total / (self.window - self.overlap) + 1);
        let mut start = 0;

        loop {
            let mut end = start + self.window;
            if end >= total {
                chunks.push(Chunk {
                    index: chunks.len(),
                    start,
                    end: total,
                    text: span(document, &offsets, start, total),
                });
                break;
            }

            if let Some(adjusted) = self.line_break_before(document, &offsets, start, end) {
                end = adjusted;
            }

            chunks.push(Chunk {
                index: chunks.len(),
                start,
                end,
                text: span(document, &offsets, start, end),
            });
            start = end - self.overlap;
        }

        chunks
    }

    /// Character offset just after the last newline in the final part of the
    /// window, if cutting there still moves the next window forward
    fn line_break_before(&self, document: &str, offsets: &[usize], start: usize, end: usize) -> Option<usize> {
        let search_from = end.saturating_sub(self.newline_search).max(start);
        let region = &document[offsets[search_from]..offsets[end]];
        let newline_byte = offsets[search_from] + region.rfind('\n')?;
        let newline_char = offsets.binary_search(&newline_byte).ok()?;
        let candidate = newline_char + 1;
        (candidate > start + self.overlap).then_some(candidate)
    }
}

fn span<'a>(document: &'a str, offsets: &[usize], start: usize, end: usize) -> &'a str {
    &document[offsets[start]..offsets[end]]
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            overlap: DEFAULT_OVERLAP,
            newline_search: DEFAULT_NEWLINE_SEARCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_chunking_needed_for_small_text() {
        let chunker = Chunker::new(100, 10).unwrap();
        let text = "Short text here.";
        let chunks = chunker.chunk(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!((chunks[0].start, chunks[0].end), (0, text.len()));
    }

    #[test]
    fn test_empty_text() {
        let chunks = Chunker::default().chunk("");
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
    }

    #[test]
    fn test_exact_window_is_single_chunk() {
        let text = "a".repeat(6000);
        assert_eq!(Chunker::default().chunk(&text).len(), 1);
    }

    #[test]
    fn test_fixed_windows_without_newlines() {
        let text = "x".repeat(15_000);
        let chunks = Chunker::default().chunk(&text);
        let spans: Vec<_> = chunks.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(spans, vec![(0, 6000), (5500, 11_500), (11_000, 15_000)]);
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn test_window_ends_after_newline() {
        // Newline 50 characters before the window edge
        let mut text = "a".repeat(949);
        text.push('\n');
        text.push_str(&"b".repeat(1000));
        let chunker = Chunker::new(1000, 100).unwrap();
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks[0].end, 950);
        assert!(chunks[0].text.ends_with('\n'));
        assert_eq!(chunks[1].start, 850);
    }

    #[test]
    fn test_newline_outside_search_range_is_ignored() {
        let mut text = "a".repeat(500);
        text.push('\n');
        text.push_str(&"b".repeat(1500));
        let chunker = Chunker::new(1000, 100).unwrap();
        assert_eq!(chunker.chunk(&text)[0].end, 1000);
    }

    #[test]
    fn test_newline_that_stalls_progress_is_ignored() {
        // A newline this close to the start would leave no forward progress
        let mut text = "a".repeat(7);
        text.push('\n');
        text.push_str(&"b".repeat(100));
        let chunker = Chunker::new(20, 10).unwrap().with_newline_search(15);
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks[0].end, 20);
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "é".repeat(250);
        let chunker = Chunker::new(100, 10).unwrap();
        let chunks = chunker.chunk(&text);
        assert_eq!(chunks.last().unwrap().end, 250);
        for chunk in &chunks {
            assert_eq!(chunk.text.chars().count(), chunk.len());
        }
    }

    #[test]
    fn test_invalid_overlap() {
        assert!(matches!(
            Chunker::new(100, 100),
            Err(ExtractorError::InvalidConfiguration(_))
        ));
        assert!(Chunker::new(100, 0).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }

    #[test]
    fn test_from_config() {
        let chunker = Chunker::from_config(&ExtractorConfig::aggressive()).unwrap();
        assert_eq!(chunker.window(), 4000);
        assert_eq!(chunker.overlap(), 300);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chunks_cover_document(
                text in "[a-z \n]{0,3000}",
                window in 50usize..400,
                overlap_pct in 1usize..50,
            ) {
                let overlap = (window * overlap_pct / 100).max(1);
                let chunker = Chunker::new(window, overlap).unwrap().with_newline_search(40);
                let chunks = chunker.chunk(&text);
                let total = text.chars().count();

                prop_assert_eq!(chunks[0].start, 0);
                prop_assert_eq!(chunks.last().unwrap().end, total);
                for chunk in &chunks {
                    prop_assert!(chunk.len() <= window);
                    let expected: String = text.chars().skip(chunk.start).take(chunk.len()).collect();
                    prop_assert_eq!(chunk.text, expected.as_str());
                }
                for pair in chunks.windows(2) {
                    prop_assert!(pair[1].start > pair[0].start);
                    prop_assert!(pair[1].start <= pair[0].end);
                }
            }

            #[test]
            fn chunk_count_floor(len in 1usize..5000, window in 100usize..1000) {
                let text = "y".repeat(len);
                let chunks = Chunker::new(window, window / 10).unwrap().chunk(&text);
                prop_assert!(chunks.len() >= len.div_ceil(window));
            }
        }
    }
}
