//! Rope-backed text buffer.
//!
//! The highlighter re-reads the whole buffer after every keystroke, so the
//! buffer has to make two things cheap: small edits anywhere in a large
//! document, and line/offset conversions for the gutter and status bar.
//! A rope gives O(log n) for both.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::history::{Edit, EditKind, History};
use crate::{BufferError, BufferResult, Position};

/// Configuration for buffer behavior
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Maximum undo steps to keep
    pub max_history: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { max_history: 1000 }
    }
}

/// A text buffer backed by a rope, with grouped undo/redo.
///
/// `TextBuffer` is `Send` but is meant to be owned by the single thread
/// that handles editor events.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    history: History,
    modified: bool,
    file_path: Option<PathBuf>,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use tinct_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty buffer with custom configuration.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(config.max_history),
            modified: false,
            file_path: None,
        }
    }

    /// Replaces the history, e.g. to change the coalesce window.
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    /// Loads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let mut buffer = Self::from(content.as_str());
        buffer.file_path = Some(path.to_path_buf());
        Ok(buffer)
    }

    /// Saves the buffer to its associated file.
    pub fn save(&mut self) -> BufferResult<()> {
        let path = self.file_path.clone().ok_or(BufferError::NoFilePath)?;
        self.save_as(&path)
    }

    /// Saves the buffer to a specific path and adopts it.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();

        // Write to a sibling temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, self.text().as_bytes())?;
        std::fs::rename(&temp_path, path)?;

        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Replaces the whole content and forgets history.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.history.clear();
        self.modified = false;
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// Borrowed when the rope is a single chunk, allocated otherwise.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a specific line (0-indexed), including its trailing newline.
    pub fn line(&self, line_idx: usize) -> BufferResult<Cow<'_, str>> {
        if line_idx >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: line_idx,
                column: 0,
            });
        }
        Ok(self.rope.line(line_idx).into())
    }

    /// Returns the text from the start of the line containing `char_idx` up
    /// to `char_idx`.
    pub fn line_prefix(&self, char_idx: usize) -> BufferResult<String> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        let line_start = self.rope.line_to_char(self.rope.char_to_line(char_idx));
        Ok(self.rope.slice(line_start..char_idx).into())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of characters (Unicode scalar values).
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of bytes.
    #[inline]
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Number of lines.
    ///
    /// An empty buffer has 1 line. A buffer ending with `\n` counts the
    /// empty line after it, which is what the gutter shows.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Converts a byte offset into a character offset.
    pub fn byte_to_char(&self, byte_idx: usize) -> BufferResult<usize> {
        if byte_idx > self.len_bytes() {
            return Err(BufferError::InvalidCharIndex(byte_idx));
        }
        Ok(self.rope.byte_to_char(byte_idx))
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.rope.insert(char_idx, text);
        self.modified = true;
        Ok(())
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.rope.remove(range);
        self.modified = true;
        Ok(deleted)
    }

    /// Replaces a range with new text as a single undo step.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        self.check_range(&range)?;
        self.history.begin_group();
        let result = self
            .delete(range.clone())
            .and_then(|deleted| self.insert(range.start, text).map(|()| deleted));
        self.history.end_group();
        result
    }

    /// Opens an undo group; see [`History::begin_group`].
    pub fn begin_group(&mut self) {
        self.history.begin_group();
    }

    /// Closes an undo group.
    pub fn end_group(&mut self) {
        self.history.end_group();
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last step.
    ///
    /// Returns where the cursor belongs afterwards, or `None` when there was
    /// nothing to undo.
    pub fn undo(&mut self) -> BufferResult<Option<usize>> {
        let Some(group) = self.history.undo() else {
            return Ok(None);
        };

        for edit in group.edits.iter().rev() {
            self.apply_raw(&edit.inverse())?;
        }
        self.modified = true;
        Ok(group.undo_cursor())
    }

    /// Redoes the last undone step.
    pub fn redo(&mut self) -> BufferResult<Option<usize>> {
        let Some(group) = self.history.redo() else {
            return Ok(None);
        };

        for edit in &group.edits {
            self.apply_raw(edit)?;
        }
        self.modified = true;
        Ok(group.redo_cursor())
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Applies an edit without recording it.
    fn apply_raw(&mut self, edit: &Edit) -> BufferResult<()> {
        match edit.kind {
            EditKind::Insert => {
                if edit.position > self.len_chars() {
                    return Err(BufferError::InvalidCharIndex(edit.position));
                }
                self.rope.insert(edit.position, &edit.content);
            }
            EditKind::Delete => {
                let range = edit.position..edit.position + edit.len_chars();
                self.check_range(&range)?;
                self.rope.remove(range);
            }
        }
        Ok(())
    }

    // ==================== Position Conversion ====================

    /// Converts a Position (line, column) to a character index.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_end = self
            .rope
            .line_to_char(pos.line + 1)
            .min(self.len_chars());
        let line = self.rope.slice(line_start..line_end);
        let line_len = line.len_chars() - usize::from(line.chars().last() == Some('\n'));

        // The column just past the last character is a valid insertion point
        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Converts a character index to a Position (line, column).
    pub fn char_idx_to_position(&self, char_idx: usize) -> BufferResult<Position> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }

        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }

    // ==================== State Queries ====================

    /// Returns true if the buffer has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the associated file path, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn check_range(&self, range: &Range<usize>) -> BufferResult<()> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len_chars(),
            });
        }
        Ok(())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.rope = Rope::from_str(s);
        buffer
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
