//! # Tinct Buffer
//!
//! The editable text behind the highlighter.
//!
//! ## Offsets
//!
//! Every offset accepted or returned by this crate is a **character** index,
//! which is what the rope addresses natively. The syntax crate works in byte
//! offsets over a `&str` snapshot; converting between the two is the
//! caller's job (`TextBuffer::byte_to_char` helps).
//!
//! ## Ownership
//! - `TextBuffer` owns the rope and its history
//! - `text()` hands out a borrowed snapshot (`Cow<str>`)
//! - Mutations require `&mut self`, so a snapshot can never observe a
//!   half-applied edit

mod buffer;
mod cursor;
mod history;

pub use buffer::{BufferConfig, TextBuffer};
pub use cursor::{Cursor, Position};
pub use history::{Edit, EditKind, History};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Invalid range {start}..{end} for buffer of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("No file path set")]
    NoFilePath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert_eq!(buffer.len_lines(), 1);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "print").unwrap();
        buffer.insert(5, "(x)").unwrap();
        assert_eq!(buffer.text(), "print(x)");

        let removed = buffer.delete(5..8).unwrap();
        assert_eq!(removed, "(x)");
        assert_eq!(buffer.text(), "print");
    }

    #[test]
    fn test_undo_redo_round() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "def").unwrap();
        buffer.insert(3, "\n").unwrap();

        assert_eq!(buffer.undo().unwrap(), Some(3));
        assert_eq!(buffer.text(), "def");

        assert_eq!(buffer.redo().unwrap(), Some(4));
        assert_eq!(buffer.text(), "def\n");
    }

    #[test]
    fn test_line_operations() {
        let buffer = TextBuffer::from("a = 1\nb = 2\nc = 3");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line(1).unwrap(), "b = 2\n");
        assert_eq!(buffer.line_prefix(9).unwrap(), "b = ");
    }
}
