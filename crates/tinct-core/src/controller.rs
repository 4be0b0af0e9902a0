//! The refresh pipeline run after every buffer change.
//!
//! ## Order of operations
//!
//! 1. Bracket rule: a typed opener gets its closer, and the cursor moves
//!    between them.
//! 2. Classification of the full text; the span set is replaced wholesale.
//! 3. Autocomplete transition for the key that caused the change.
//! 4. Gutter and status notifications.
//!
//! The bracket step runs first so that the closer is already in the text
//! when it is classified.

use std::sync::Arc;
use std::time::Instant;

use tinct_buffer::{Cursor, TextBuffer};
use tinct_syntax::{Classifier, Span};

use crate::autocomplete::{AutocompleteEngine, AutocompleteState, Completion, Key};
use crate::brackets::BracketCompleter;
use crate::event::{EditorEvent, EventBus};
use crate::render::CursorPosition;
use crate::{Config, CoreResult};

/// What happened to the buffer before a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// One character was typed at a character offset
    Typed { ch: char, at: usize },
    /// Backspace removed text before the cursor
    Backspace,
    /// A block of text was pasted at the cursor
    Paste,
    /// Text changed without a keystroke (load, undo, programmatic edit)
    Replaced,
}

impl Change {
    fn key(&self) -> Option<Key> {
        match self {
            Change::Typed { ch, .. } => Some(Key::from_char(*ch)),
            Change::Backspace => Some(Key::Backspace),
            Change::Paste => Some(Key::Paste),
            Change::Replaced => None,
        }
    }
}

/// Keeps spans, autocomplete and gutter state in sync with the buffer.
#[derive(Debug)]
pub struct HighlightController {
    classifier: Classifier,
    brackets: BracketCompleter,
    autocomplete: AutocompleteEngine,
    spans: Arc<[Span]>,
    line_count: usize,
    events: EventBus,
}

impl HighlightController {
    /// Builds a controller for the Python lexicon.
    pub fn new(config: &Config, events: EventBus) -> CoreResult<Self> {
        let classifier = Classifier::new(
            tinct_syntax::Lexicon::python(),
            config.classifier_options(),
        )?;
        Ok(Self::with_parts(
            classifier,
            BracketCompleter::new(config.editor.auto_close_brackets),
            config,
            events,
        ))
    }

    /// Builds a controller around an existing classifier.
    pub fn with_parts(
        classifier: Classifier,
        brackets: BracketCompleter,
        config: &Config,
        events: EventBus,
    ) -> Self {
        let autocomplete = AutocompleteEngine::new(
            Arc::clone(classifier.lexicon()),
            config.autocomplete_options(),
        );
        Self {
            classifier,
            brackets,
            autocomplete,
            spans: Arc::from(Vec::new()),
            line_count: 1,
            events,
        }
    }

    // ==================== Pipeline ====================

    /// Runs the full pipeline after `change` was applied to `buffer`.
    ///
    /// For a typed opener, the closer is inserted here and `cursor` is moved
    /// between the two.
    pub fn refresh(
        &mut self,
        change: Change,
        buffer: &mut TextBuffer,
        cursor: &mut Cursor,
    ) -> CoreResult<()> {
        if let Change::Typed { ch, at } = change {
            if let Some(action) = self.brackets.on_char_typed(ch, at) {
                buffer.insert(action.insert_at, action.insert_text)?;
                cursor.move_to(action.cursor_offset_after, buffer.len_chars());
            }
        }

        self.classify(buffer);

        let state = match change.key() {
            Some(key) => {
                let offset = cursor.offset();
                let line_prefix = buffer.line_prefix(offset)?;
                let anchor = buffer.char_idx_to_position(offset)?;
                self.autocomplete.on_key(key, &line_prefix, anchor).clone()
            }
            None => {
                self.autocomplete.dismiss();
                AutocompleteState::Hidden
            }
        };
        self.events.emit(EditorEvent::AutocompleteChanged(state));

        self.notify(buffer, cursor)
    }

    /// Re-classifies and re-publishes without touching the buffer.
    pub fn rerender(&mut self, buffer: &TextBuffer, cursor: &Cursor) -> CoreResult<()> {
        self.classify(buffer);
        self.notify(buffer, cursor)
    }

    /// Reacts to a cursor move that did not edit text.
    pub fn cursor_moved(&mut self, buffer: &TextBuffer, cursor: &Cursor) -> CoreResult<()> {
        if self.autocomplete.dismiss() {
            self.events
                .emit(EditorEvent::AutocompleteChanged(AutocompleteState::Hidden));
        }
        let position = buffer.char_idx_to_position(cursor.offset())?;
        self.events
            .emit(EditorEvent::CursorMoved(CursorPosition::from(position)));
        Ok(())
    }

    fn classify(&mut self, buffer: &TextBuffer) {
        let started = Instant::now();
        let text = buffer.text();
        self.spans = Arc::from(self.classifier.classify(&text));
        tracing::debug!(
            chars = buffer.len_chars(),
            spans = self.spans.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "refreshed highlighting"
        );
        self.events
            .emit(EditorEvent::SpansUpdated(Arc::clone(&self.spans)));
    }

    fn notify(&mut self, buffer: &TextBuffer, cursor: &Cursor) -> CoreResult<()> {
        self.line_count = buffer.len_lines();
        self.events
            .emit(EditorEvent::LineCountChanged(self.line_count));

        let position = buffer.char_idx_to_position(cursor.offset())?;
        self.events
            .emit(EditorEvent::CursorMoved(CursorPosition::from(position)));
        Ok(())
    }

    // ==================== Autocomplete ====================

    /// Accepts a suggestion; see [`AutocompleteEngine::accept`].
    pub fn accept(&mut self, selected: usize, cursor_offset: usize) -> Option<Completion> {
        self.autocomplete.accept(selected, cursor_offset)
    }

    /// Hides suggestions, publishing the change if they were visible.
    pub fn dismiss(&mut self) {
        if self.autocomplete.dismiss() {
            self.events
                .emit(EditorEvent::AutocompleteChanged(AutocompleteState::Hidden));
        }
    }

    // ==================== Accessors ====================

    /// Layered spans for the last classified snapshot.
    pub fn spans(&self) -> &Arc<[Span]> {
        &self.spans
    }

    pub fn autocomplete(&self) -> &AutocompleteState {
        self.autocomplete.state()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventHandler;
    use tinct_syntax::TokenCategory;

    fn controller() -> (HighlightController, EventHandler) {
        let events = EventBus::new();
        let handler = EventHandler::new(events.subscribe());
        let controller = HighlightController::new(&Config::default(), events).unwrap();
        (controller, handler)
    }

    /// Inserts `ch` at the cursor the way the editor does, then refreshes.
    fn type_char(
        controller: &mut HighlightController,
        buffer: &mut TextBuffer,
        cursor: &mut Cursor,
        ch: char,
    ) {
        let at = cursor.offset();
        buffer.insert(at, &ch.to_string()).unwrap();
        cursor.after_insert(at, 1);
        controller
            .refresh(Change::Typed { ch, at }, buffer, cursor)
            .unwrap();
    }

    #[test]
    fn test_typed_opener_gets_closer() {
        let (mut controller, _) = controller();
        let mut buffer = TextBuffer::new();
        let mut cursor = Cursor::default();

        type_char(&mut controller, &mut buffer, &mut cursor, '(');

        assert_eq!(buffer.text(), "()");
        assert_eq!(cursor.offset(), 1);
        let categories: Vec<_> = controller.spans().iter().map(|s| s.category).collect();
        assert_eq!(categories, [TokenCategory::Collection, TokenCategory::Collection]);
    }

    #[test]
    fn test_events_arrive_in_pipeline_order() {
        let (mut controller, mut handler) = controller();
        let mut buffer = TextBuffer::new();
        let mut cursor = Cursor::default();

        type_char(&mut controller, &mut buffer, &mut cursor, 'x');

        let events = handler.drain();
        assert!(matches!(events[0], EditorEvent::SpansUpdated(_)));
        assert!(matches!(
            events[1],
            EditorEvent::AutocompleteChanged(AutocompleteState::Hidden)
        ));
        assert!(matches!(events[2], EditorEvent::LineCountChanged(1)));
        assert!(matches!(
            events[3],
            EditorEvent::CursorMoved(CursorPosition { line: 1, column: 1 })
        ));
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_autocomplete_sequence() {
        let (mut controller, _) = controller();
        let mut buffer = TextBuffer::new();
        let mut cursor = Cursor::default();

        for ch in "cl".chars() {
            type_char(&mut controller, &mut buffer, &mut cursor, ch);
        }
        let suggestions = controller.autocomplete().suggestions().unwrap();
        assert_eq!(suggestions.candidates, ["class"]);

        type_char(&mut controller, &mut buffer, &mut cursor, 'a');
        assert!(controller.autocomplete().is_visible());

        buffer.delete(2..3).unwrap();
        cursor.after_delete(2..3);
        controller
            .refresh(Change::Backspace, &mut buffer, &mut cursor)
            .unwrap();
        assert_eq!(*controller.autocomplete(), AutocompleteState::Hidden);
    }

    #[test]
    fn test_prefix_is_taken_from_current_line() {
        let (mut controller, _) = controller();
        let mut buffer = TextBuffer::from("x = 1\n");
        let mut cursor = Cursor::new(buffer.len_chars());

        for ch in "wh".chars() {
            type_char(&mut controller, &mut buffer, &mut cursor, ch);
        }
        let suggestions = controller.autocomplete().suggestions().unwrap();
        assert_eq!(suggestions.prefix, "wh");
        assert_eq!(suggestions.anchor, tinct_buffer::Position::new(1, 2));
    }

    #[test]
    fn test_line_count_tracks_newlines() {
        let (mut controller, mut handler) = controller();
        let mut buffer = TextBuffer::from("a");
        let mut cursor = Cursor::new(1);

        type_char(&mut controller, &mut buffer, &mut cursor, '\n');
        assert_eq!(controller.line_count(), 2);
        assert!(handler
            .drain()
            .iter()
            .any(|e| matches!(e, EditorEvent::LineCountChanged(2))));
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let (mut controller, mut handler) = controller();
        let buffer = TextBuffer::from("def f(x):\n    return x + 3j  # done\n");
        let cursor = Cursor::default();

        controller.rerender(&buffer, &cursor).unwrap();
        let first = Arc::clone(controller.spans());
        controller.rerender(&buffer, &cursor).unwrap();
        assert_eq!(first[..], controller.spans()[..]);

        let events = handler.drain();
        assert_eq!(events.len(), 6);
        assert!(!events
            .iter()
            .any(|e| matches!(e, EditorEvent::AutocompleteChanged(_))));
    }

    #[test]
    fn test_replaced_change_hides_suggestions() {
        let (mut controller, _) = controller();
        let mut buffer = TextBuffer::new();
        let mut cursor = Cursor::default();
        for ch in "as".chars() {
            type_char(&mut controller, &mut buffer, &mut cursor, ch);
        }
        assert!(controller.autocomplete().is_visible());

        controller
            .refresh(Change::Replaced, &mut buffer, &mut cursor)
            .unwrap();
        assert!(!controller.autocomplete().is_visible());
    }

    #[test]
    fn test_cursor_move_dismisses() {
        let (mut controller, mut handler) = controller();
        let mut buffer = TextBuffer::new();
        let mut cursor = Cursor::default();
        for ch in "as".chars() {
            type_char(&mut controller, &mut buffer, &mut cursor, ch);
        }
        handler.drain();

        cursor.move_to(0, buffer.len_chars());
        controller.cursor_moved(&buffer, &cursor).unwrap();

        let events = handler.drain();
        assert!(matches!(
            events[0],
            EditorEvent::AutocompleteChanged(AutocompleteState::Hidden)
        ));
        assert!(matches!(
            events[1],
            EditorEvent::CursorMoved(CursorPosition { line: 1, column: 0 })
        ));
    }
}
