//! Chunk module - bounded windows over a source document

/// A contiguous window of the source document
///
/// Offsets are character offsets (Unicode scalar values) into the document,
/// `start` inclusive and `end` exclusive. Consecutive chunks may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position of the chunk in document order, starting at 0
    pub index: usize,

    /// Character offset of the first character
    pub start: usize,

    /// Character offset one past the last character
    pub end: usize,

    /// The chunk text, borrowed from the document
    pub text: &'a str,
}

impl<'a> Chunk<'a> {
    /// Number of characters in the chunk
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-length chunk
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Human-readable label used in logs and diagnostics
    pub fn label(&self) -> String {
        format!("chunk {} (chars {}..{})", self.index + 1, self.start, self.end)
    }
}
