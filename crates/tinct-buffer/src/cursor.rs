//! Positions and the insertion mark.
//!
//! `Position` is a line/column pair; `Cursor` is the single insertion mark
//! the editor types at. The mark is stored as a character offset because
//! every edit the core performs is offset based, and it is converted to a
//! `Position` only when something needs to be displayed.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed; column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// The insertion mark.
///
/// The mark has right gravity: edits before it shift it, and text inserted
/// exactly at the mark pushes it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    /// Creates a cursor at a character offset.
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Character offset of the mark.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the mark to an offset, clamped to `len`.
    pub fn move_to(&mut self, offset: usize, len: usize) {
        self.offset = offset.min(len);
    }

    /// Adjusts the mark after `inserted` characters were inserted at `at`.
    pub fn after_insert(&mut self, at: usize, inserted: usize) {
        if at <= self.offset {
            self.offset += inserted;
        }
    }

    /// Adjusts the mark after `range` was removed.
    pub fn after_delete(&mut self, range: Range<usize>) {
        if self.offset >= range.end {
            self.offset -= range.end - range.start;
        } else if self.offset > range.start {
            self.offset = range.start;
        }
    }
}
