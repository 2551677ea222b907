//! Position mapping for diagnostics.
//!
//! Parsers work on offsets (byte offsets into text, or token indices that
//! carry byte offsets). Only when a failure is reported does an offset get
//! turned into a human position, through a [`PositionMap`].
//!
//! [`DefaultPositionMap`] pre-computes the offsets of every line break so a
//! lookup is a binary search plus a char count within one line.

use std::fmt;

/// A 1-based line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Pos { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Converts an offset into a [`Pos`].
///
/// Implementations are shared by every parse context created for the same
/// source, including nested ones, so they must be thread-safe.
pub trait PositionMap: Send + Sync {
    fn to_pos(&self, index: usize) -> Pos;
}

/// Line-break based position map over a source string.
///
/// - The line of `index` is `start_line` plus the number of line breaks
///   strictly before `index`, so a break belongs to the line it ends.
/// - On the first line the column is `start_column` plus the chars before
///   `index`; on later lines it is 1 plus the chars since the previous break.
/// - `index == source.len()` (end of input) maps like any other offset.
#[derive(Clone, Debug)]
pub struct DefaultPositionMap<'src> {
    source: &'src str,
    start_line: u32,
    start_column: u32,
    break_len: usize,
    /// Byte offset of every line break, ascending.
    breaks: Vec<usize>,
}

impl<'src> DefaultPositionMap<'src> {
    pub fn new(source: &'src str, start_line: u32, start_column: u32, line_break: char) -> Self {
        let mut encoded = [0u8; 4];
        let needle = line_break.encode_utf8(&mut encoded).as_bytes();
        let breaks = if let [byte] = needle {
            memchr::memchr_iter(*byte, source.as_bytes()).collect()
        } else {
            memchr::memmem::find_iter(source.as_bytes(), needle).collect()
        };
        DefaultPositionMap {
            source,
            start_line,
            start_column,
            break_len: needle.len(),
            breaks,
        }
    }

    /// Line 1, column 1, `'\n'` line breaks.
    pub fn with_defaults(source: &'src str) -> Self {
        Self::new(source, 1, 1, '\n')
    }

    /// Number of lines, counting the (possibly empty) one after the last break.
    pub fn line_count(&self) -> usize {
        self.breaks.len() + 1
    }
}

impl PositionMap for DefaultPositionMap<'_> {
    fn to_pos(&self, index: usize) -> Pos {
        let index = index.min(self.source.len());
        let line_idx = self.breaks.partition_point(|&b| b < index);
        let (line_start, base) = match line_idx {
            0 => (0, self.start_column),
            n => (self.breaks[n - 1] + self.break_len, 1),
        };
        let chars = self.source[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < index)
            .count();
        Pos {
            line: self.start_line.saturating_add(to_u32(line_idx)),
            column: base.saturating_add(to_u32(chars)),
        }
    }
}

/// A position map that reports every offset as the same position.
///
/// Handy for sources that are not text (pre-built token arrays in tests).
#[derive(Clone, Copy, Debug)]
pub struct FixedPositionMap(pub Pos);

impl PositionMap for FixedPositionMap {
    fn to_pos(&self, _index: usize) -> Pos {
        self.0
    }
}

#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
