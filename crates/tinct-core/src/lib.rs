//! # Tinct Core
//!
//! Editor state and the pipeline that keeps highlighting in sync with it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Editor                            │
//! │  ┌────────────┐ ┌──────────┐ ┌────────┐ ┌──────────────┐ │
//! │  │ TextBuffer │ │  Cursor  │ │ Theme  │ │   EventBus   │ │
//! │  └────────────┘ └──────────┘ └────────┘ └──────────────┘ │
//! │         │ &mut for one refresh                            │
//! │  ┌──────┴───────────────────────────────────────┐        │
//! │  │             HighlightController               │        │
//! │  │  BracketCompleter → Classifier → Autocomplete │        │
//! │  └───────────────────────────────────────────────┘        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Ownership of the buffer
//!
//! Only the `Editor` owns the buffer. The controller borrows it mutably for
//! the length of one refresh, so no other code can observe the text halfway
//! through a bracket insertion.

pub mod autocomplete;
pub mod brackets;
pub mod config;
pub mod controller;
pub mod editor;
pub mod event;
pub mod render;
pub mod theme;

pub use autocomplete::{AutocompleteEngine, AutocompleteState, Completion, Key, Suggestions};
pub use brackets::{BracketAction, BracketCompleter};
pub use config::Config;
pub use controller::{Change, HighlightController};
pub use editor::Editor;
pub use event::{EditorEvent, EventBus, EventHandler};
pub use render::{CursorPosition, clip_spans, gutter_text, resolve_runs};
pub use theme::{Color, Theme};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] tinct_buffer::BufferError),

    #[error("Syntax error: {0}")]
    Syntax(#[from] tinct_syntax::SyntaxError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}
