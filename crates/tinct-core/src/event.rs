//! Event system for editor notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Instead of the controller holding references to the gutter, status bar
//! and suggestion popup, it publishes values on a `tokio::sync::broadcast`
//! channel and each collaborator subscribes:
//! - No object references to manage
//! - Events are values, not callbacks
//! - Subscribers receive copies (Clone)
//!
//! `send` and `try_recv` never block, so the bus also works from plain
//! synchronous code with no runtime running.

use std::path::PathBuf;
use std::sync::Arc;

use tinct_syntax::Span;
use tokio::sync::broadcast;

use crate::autocomplete::AutocompleteState;
use crate::render::CursorPosition;

/// Events published by the editor core.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    // Highlighting
    /// The layered span set was recomputed
    SpansUpdated(Arc<[Span]>),
    /// Autocomplete moved to a new state
    AutocompleteChanged(AutocompleteState),

    // Gutter and status bar
    /// Number of lines in the buffer
    LineCountChanged(usize),
    /// Insertion mark position
    CursorMoved(CursorPosition),

    // Shell
    /// Theme was switched; carries the theme name
    ThemeChanged(String),
    /// New content was loaded, from a file or not
    DocumentLoaded(Option<PathBuf>),
    DocumentSaved(PathBuf),
}

/// Broadcasts editor events to any number of subscribers.
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Queue depth per subscriber; slow subscribers lose the oldest events.
    pub const CAPACITY: usize = 256;

    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self { sender }
    }

    /// Publishes an event. Having no subscribers is fine.
    pub fn emit(&self, event: EditorEvent) {
        let _ = self.sender.send(event);
    }

    /// A receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Collects queued events for a shell that polls after each operation.
///
/// ```
/// use tinct_core::{Config, Editor, EditorEvent, EventHandler};
///
/// let mut editor = Editor::new(Config::default()).unwrap();
/// let mut handler = EventHandler::new(editor.subscribe());
/// editor.type_str("x\ny").unwrap();
///
/// let lines = handler.drain().into_iter().filter_map(|event| match event {
///     EditorEvent::LineCountChanged(n) => Some(n),
///     _ => None,
/// });
/// assert_eq!(lines.last(), Some(2));
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<EditorEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<EditorEvent>) -> Self {
        Self { receiver }
    }

    /// Takes every event already queued, without waiting.
    ///
    /// Events lost to lag are skipped with a warning.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                }
                Err(_) => return events,
            }
        }
    }
}
