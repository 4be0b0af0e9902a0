//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` acts as a facade over the buffer, the insertion mark and the
//! highlight pipeline. A front end turns user input into calls on `Editor`
//! and redraws from its accessors (or from the event bus); it never touches
//! the buffer directly.

use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tinct_buffer::{BufferConfig, BufferError, Cursor, History, Position, TextBuffer};
use tinct_syntax::Span;
use tokio::sync::broadcast;

use crate::autocomplete::AutocompleteState;
use crate::brackets::BracketCompleter;
use crate::config::Config;
use crate::controller::{Change, HighlightController};
use crate::event::{EditorEvent, EventBus};
use crate::render::{self, CursorPosition};
use crate::theme::Theme;
use crate::CoreResult;

/// The editor state for one document.
///
/// ## Thread Safety
///
/// `Editor` is owned by the thread handling input. Every operation runs to
/// completion, including reclassification, before it returns.
#[derive(Debug)]
pub struct Editor {
    buffer: TextBuffer,

    /// Insertion mark
    cursor: Cursor,

    /// Brackets, classification and autocomplete
    controller: HighlightController,

    config: Config,
    theme: Theme,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor with an empty buffer.
    ///
    /// An unknown theme name in `config` falls back to the light theme.
    pub fn new(config: Config) -> CoreResult<Self> {
        let event_bus = EventBus::new();
        let controller = HighlightController::new(&config, event_bus.clone())?;
        let theme = Theme::named(&config.ui.theme).unwrap_or_else(|err| {
            tracing::warn!("{}, using Light", err);
            Theme::light()
        });

        let mut editor = Self {
            buffer: empty_buffer(&config),
            cursor: Cursor::default(),
            controller,
            config,
            theme,
            event_bus,
        };
        editor.controller.rerender(&editor.buffer, &editor.cursor)?;
        Ok(editor)
    }

    /// Creates an editor preloaded with `text`.
    pub fn with_text(config: Config, text: &str) -> CoreResult<Self> {
        let mut editor = Self::new(config)?;
        editor.load_text(text)?;
        Ok(editor)
    }

    // ==================== Document Operations ====================

    /// Replaces the whole document with `text`, forgetting undo history.
    pub fn load_text(&mut self, text: &str) -> CoreResult<()> {
        let mut buffer = empty_buffer(&self.config);
        buffer.set_text(text);
        self.replace_document(buffer, None)
    }

    /// Opens a file, replacing the current document.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let buffer = TextBuffer::from_file(path)?
            .with_history(History::new(self.config.editor.undo_limit));
        tracing::info!("Opened {}", path.display());
        self.replace_document(buffer, Some(path.to_path_buf()))
    }

    fn replace_document(&mut self, buffer: TextBuffer, path: Option<PathBuf>) -> CoreResult<()> {
        self.buffer = buffer;
        self.cursor = Cursor::default();
        self.controller.dismiss();
        self.emit(EditorEvent::DocumentLoaded(path));
        self.controller.rerender(&self.buffer, &self.cursor)
    }

    /// Saves to the file the document was opened from or last saved to.
    pub fn save(&mut self) -> CoreResult<PathBuf> {
        self.buffer.save()?;
        self.saved()
    }

    /// Saves to `path` and adopts it as the document's file.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<PathBuf> {
        self.buffer.save_as(path)?;
        self.saved()
    }

    fn saved(&mut self) -> CoreResult<PathBuf> {
        let path = self
            .buffer
            .file_path()
            .map(Path::to_path_buf)
            .ok_or(BufferError::NoFilePath)?;
        tracing::info!("Saved {}", path.display());
        self.emit(EditorEvent::DocumentSaved(path.clone()));
        Ok(path)
    }

    // ==================== Editing ====================

    /// Types one character at the cursor.
    ///
    /// An opening bracket and its automatic closer form a single undo step.
    pub fn type_char(&mut self, ch: char) -> CoreResult<()> {
        let grouped = self.config.editor.auto_close_brackets
            && BracketCompleter::closer_for(ch).is_some();
        if grouped {
            self.buffer.begin_group();
        }

        let result = self.insert_typed(ch);

        if grouped {
            self.buffer.end_group();
        }
        result
    }

    fn insert_typed(&mut self, ch: char) -> CoreResult<()> {
        let at = self.cursor.offset();
        let mut encoded = [0; 4];
        self.buffer.insert(at, ch.encode_utf8(&mut encoded))?;
        self.cursor.after_insert(at, 1);
        self.controller
            .refresh(Change::Typed { ch, at }, &mut self.buffer, &mut self.cursor)
    }

    /// Types every character of `text` in turn, as keystrokes.
    pub fn type_str(&mut self, text: &str) -> CoreResult<()> {
        for ch in text.chars() {
            self.type_char(ch)?;
        }
        Ok(())
    }

    /// Inserts a line break at the cursor.
    pub fn newline(&mut self) -> CoreResult<()> {
        self.type_char('\n')
    }

    /// Deletes the character before the cursor.
    ///
    /// At the start of the buffer nothing is deleted, but suggestions are
    /// still hidden.
    pub fn backspace(&mut self) -> CoreResult<()> {
        let at = self.cursor.offset();
        if at > 0 {
            let range = at - 1..at;
            self.buffer.delete(range.clone())?;
            self.cursor.after_delete(range);
        }
        self.controller
            .refresh(Change::Backspace, &mut self.buffer, &mut self.cursor)
    }

    /// Inserts a block of text at the cursor as its own undo step.
    pub fn paste(&mut self, text: &str) -> CoreResult<()> {
        let at = self.cursor.offset();
        self.buffer.begin_group();
        let inserted = self.buffer.insert(at, text);
        self.buffer.end_group();
        inserted?;
        self.cursor.after_insert(at, text.chars().count());
        self.controller
            .refresh(Change::Paste, &mut self.buffer, &mut self.cursor)
    }

    /// Replaces a character range without it counting as a keystroke.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> CoreResult<()> {
        self.buffer.replace(range.clone(), text)?;
        self.cursor.after_delete(range.clone());
        self.cursor.after_insert(range.start, text.chars().count());
        self.controller
            .refresh(Change::Replaced, &mut self.buffer, &mut self.cursor)
    }

    /// Undoes the last step. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> CoreResult<bool> {
        let landing = self.buffer.undo()?;
        self.after_history(landing)
    }

    /// Redoes the last undone step. Returns false when there was nothing to
    /// redo.
    pub fn redo(&mut self) -> CoreResult<bool> {
        let landing = self.buffer.redo()?;
        self.after_history(landing)
    }

    fn after_history(&mut self, landing: Option<usize>) -> CoreResult<bool> {
        let Some(offset) = landing else {
            return Ok(false);
        };
        self.cursor.move_to(offset, self.buffer.len_chars());
        self.controller
            .refresh(Change::Replaced, &mut self.buffer, &mut self.cursor)?;
        Ok(true)
    }

    // ==================== Cursor ====================

    /// Moves the cursor to a character offset, clamped to the buffer.
    pub fn move_cursor_to(&mut self, offset: usize) -> CoreResult<()> {
        self.cursor.move_to(offset, self.buffer.len_chars());
        self.controller.cursor_moved(&self.buffer, &self.cursor)
    }

    /// Moves the cursor to a 1-based line and 0-based column.
    pub fn move_cursor(&mut self, line: usize, column: usize) -> CoreResult<()> {
        let position = line
            .checked_sub(1)
            .map(|line| Position::new(line, column))
            .ok_or(BufferError::PositionOutOfBounds { line, column })?;
        let offset = self.buffer.position_to_char_idx(position)?;
        self.move_cursor_to(offset)
    }

    // ==================== Autocomplete ====================

    /// Replaces the typed prefix with suggestion `index`.
    ///
    /// Returns false while no suggestions are shown or for an index past
    /// the list. The replacement is a single undo step.
    pub fn accept_completion(&mut self, index: usize) -> CoreResult<bool> {
        let Some(completion) = self.controller.accept(index, self.cursor.offset()) else {
            return Ok(false);
        };

        self.buffer.replace(completion.replace.clone(), &completion.text)?;
        self.cursor
            .move_to(completion.cursor_after(), self.buffer.len_chars());
        self.controller
            .refresh(Change::Replaced, &mut self.buffer, &mut self.cursor)?;
        Ok(true)
    }

    /// Hides the suggestion list.
    pub fn dismiss_completion(&mut self) {
        self.controller.dismiss();
    }

    // ==================== Theme ====================

    /// Switches to a built-in theme by name.
    pub fn set_theme(&mut self, name: &str) -> CoreResult<()> {
        let theme = Theme::named(name)?;
        self.apply_theme(theme)
    }

    /// Switches to a theme read from a JSON file.
    pub fn load_theme_file(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let theme = Theme::load(path)?;
        tracing::info!("Loaded theme {} from {}", theme.name, path.display());
        self.apply_theme(theme)
    }

    /// Switches between the light and dark themes.
    pub fn toggle_theme(&mut self) -> CoreResult<()> {
        let theme = if self.theme.is_dark {
            Theme::light()
        } else {
            Theme::dark()
        };
        self.apply_theme(theme)
    }

    fn apply_theme(&mut self, theme: Theme) -> CoreResult<()> {
        self.theme = theme;
        self.emit(EditorEvent::ThemeChanged(self.theme.name.clone()));
        self.controller.rerender(&self.buffer, &self.cursor)
    }

    // ==================== Accessors ====================

    pub fn text(&self) -> Cow<'_, str> {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn cursor_position(&self) -> CursorPosition {
        self.buffer
            .char_idx_to_position(self.cursor.offset())
            .map_or(CursorPosition::new(1, 0), CursorPosition::from)
    }

    /// Layered spans over the current text, in byte offsets.
    pub fn spans(&self) -> &Arc<[Span]> {
        self.controller.spans()
    }

    /// The spans resolved into non-overlapping runs for painting.
    pub fn runs(&self) -> Vec<Span> {
        render::resolve_runs(&self.text(), self.spans())
    }

    pub fn autocomplete(&self) -> &AutocompleteState {
        self.controller.autocomplete()
    }

    pub fn line_count(&self) -> usize {
        self.controller.line_count()
    }

    pub fn gutter_text(&self) -> String {
        render::gutter_text(self.line_count())
    }

    pub fn status_text(&self) -> String {
        self.cursor_position().status_text()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.buffer.file_path()
    }

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}

fn empty_buffer(config: &Config) -> TextBuffer {
    TextBuffer::with_config(BufferConfig {
        max_history: config.editor.undo_limit,
    })
}
