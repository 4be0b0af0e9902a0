//! Keyword autocompletion.
//!
//! ## Learning: State machines as enums
//!
//! The engine has two states. Encoding them as an enum whose `Visible`
//! variant owns the suggestion data makes it impossible to read candidates
//! while the popup is hidden:
//!
//! ```text
//!            content key, prefix matches
//!   Hidden ─────────────────────────────▶ Visible
//!     ▲  ◀──────────────────────────────    │
//!     │   backspace / return / space /      │ content key
//!     │   accept / dismiss / cursor move    ▼
//!     └──────── no match or short prefix ◀──┘
//! ```

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use tinct_buffer::Position;
use tinct_syntax::Lexicon;

/// A keystroke as far as autocomplete cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any printable character other than space
    Char(char),
    Space,
    Return,
    Backspace,
    /// A block of text arriving at once
    Paste,
}

impl Key {
    /// Classifies a typed character.
    pub fn from_char(ch: char) -> Self {
        match ch {
            ' ' => Key::Space,
            '\n' | '\r' => Key::Return,
            ch => Key::Char(ch),
        }
    }

    /// Keys that recompute suggestions instead of hiding them.
    pub fn produces_content(&self) -> bool {
        matches!(self, Key::Char(_) | Key::Paste)
    }
}

/// What the suggestion list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// The word fragment the candidates complete
    pub prefix: String,
    pub candidates: Vec<String>,
    /// Where the list is anchored (the cursor at the last transition)
    pub anchor: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AutocompleteState {
    #[default]
    Hidden,
    Visible(Suggestions),
}

impl AutocompleteState {
    pub fn is_visible(&self) -> bool {
        matches!(self, AutocompleteState::Visible(_))
    }

    pub fn suggestions(&self) -> Option<&Suggestions> {
        match self {
            AutocompleteState::Visible(suggestions) => Some(suggestions),
            AutocompleteState::Hidden => None,
        }
    }
}

/// A replacement produced by accepting a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Character range holding the typed prefix
    pub replace: Range<usize>,
    pub text: String,
}

impl Completion {
    /// Cursor offset once the replacement is applied.
    pub fn cursor_after(&self) -> usize {
        self.replace.start + self.text.chars().count()
    }
}

/// Autocomplete settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub enabled: bool,
    /// Shortest prefix (in characters) that opens the list
    pub min_prefix_len: usize,
    /// Candidate cap; 0 means unlimited
    pub max_candidates: usize,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            min_prefix_len: 2,
            max_candidates: 0,
        }
    }
}

/// Suggests keywords for the word being typed.
#[derive(Debug, Clone)]
pub struct AutocompleteEngine {
    lexicon: Arc<Lexicon>,
    options: AutocompleteOptions,
    state: AutocompleteState,
}

impl AutocompleteEngine {
    pub fn new(lexicon: Arc<Lexicon>, options: AutocompleteOptions) -> Self {
        Self {
            lexicon,
            options,
            state: AutocompleteState::Hidden,
        }
    }

    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    /// Runs one transition.
    ///
    /// `line_prefix` is the current line up to the cursor, and `anchor` the
    /// cursor position after the key was applied.
    pub fn on_key(&mut self, key: Key, line_prefix: &str, anchor: Position) -> &AutocompleteState {
        self.state = if key.produces_content() {
            self.suggest(line_prefix, anchor)
        } else {
            AutocompleteState::Hidden
        };
        &self.state
    }

    fn suggest(&self, line_prefix: &str, anchor: Position) -> AutocompleteState {
        if !self.options.enabled {
            return AutocompleteState::Hidden;
        }

        let prefix = word_prefix(line_prefix);
        if prefix.is_empty() || prefix.chars().count() < self.options.min_prefix_len {
            return AutocompleteState::Hidden;
        }

        let limit = match self.options.max_candidates {
            0 => usize::MAX,
            n => n,
        };
        let candidates: Vec<String> = self
            .lexicon
            .completions(prefix)
            .take(limit)
            .map(str::to_string)
            .collect();

        if candidates.is_empty() {
            return AutocompleteState::Hidden;
        }
        AutocompleteState::Visible(Suggestions {
            prefix: prefix.to_string(),
            candidates,
            anchor,
        })
    }

    /// Accepts a candidate, hiding the list.
    ///
    /// Returns `None` while hidden or for an index past the candidate list.
    pub fn accept(&mut self, selected: usize, cursor_offset: usize) -> Option<Completion> {
        let Some(suggestions) = self.state.suggestions() else {
            tracing::trace!("accept({}) ignored: no suggestions", selected);
            return None;
        };
        let Some(text) = suggestions.candidates.get(selected) else {
            tracing::trace!(
                "accept({}) ignored: {} candidates",
                selected,
                suggestions.candidates.len()
            );
            return None;
        };

        let prefix_len = suggestions.prefix.chars().count();
        let completion = Completion {
            replace: cursor_offset.saturating_sub(prefix_len)..cursor_offset,
            text: text.clone(),
        };
        self.state = AutocompleteState::Hidden;
        Some(completion)
    }

    /// Hides the list. Returns true if it was visible.
    pub fn dismiss(&mut self) -> bool {
        let was_visible = self.state.is_visible();
        self.state = AutocompleteState::Hidden;
        was_visible
    }
}

/// The trailing run of word characters in `line`.
pub fn word_prefix(line: &str) -> &str {
    let start = line
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map_or(line.len(), |(idx, _)| idx);
    &line[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AutocompleteEngine {
        AutocompleteEngine::new(Lexicon::python(), AutocompleteOptions::default())
    }

    fn candidates(state: &AutocompleteState) -> Vec<&str> {
        state
            .suggestions()
            .map(|s| s.candidates.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_word_prefix() {
        assert_eq!(word_prefix("x = cl"), "cl");
        assert_eq!(word_prefix("    my_var2"), "my_var2");
        assert_eq!(word_prefix("print("), "");
        assert_eq!(word_prefix(""), "");
        assert_eq!(word_prefix("ñandú"), "ñandú");
    }

    #[test]
    fn test_prefix_shows_matching_keywords() {
        let mut ac = engine();
        let state = ac.on_key(Key::Char('l'), "cl", Position::new(0, 2));
        assert_eq!(candidates(state), ["class"]);

        let suggestions = ac.state().suggestions().unwrap();
        assert_eq!(suggestions.prefix, "cl");
        assert_eq!(suggestions.anchor, Position::new(0, 2));
    }

    #[test]
    fn test_backspace_hides_even_if_prefix_still_matches() {
        let mut ac = engine();
        ac.on_key(Key::Char('a'), "cla", Position::new(0, 3));
        assert!(ac.state().is_visible());

        ac.on_key(Key::Backspace, "cl", Position::new(0, 2));
        assert_eq!(*ac.state(), AutocompleteState::Hidden);
    }

    #[test]
    fn test_space_and_return_hide() {
        let mut ac = engine();
        for key in [Key::Space, Key::Return] {
            ac.on_key(Key::Char('s'), "as", Position::new(0, 2));
            assert!(ac.state().is_visible());
            ac.on_key(key, "as ", Position::new(0, 3));
            assert!(!ac.state().is_visible());
        }
    }

    #[test]
    fn test_short_prefix_and_no_match_hide() {
        let mut ac = engine();
        ac.on_key(Key::Char('c'), "c", Position::new(0, 1));
        assert!(!ac.state().is_visible());

        ac.on_key(Key::Char('z'), "zz", Position::new(0, 2));
        assert!(!ac.state().is_visible());

        ac.on_key(Key::Char('('), "print(", Position::new(0, 6));
        assert!(!ac.state().is_visible());
    }

    #[test]
    fn test_candidates_keep_canonical_order_and_limit() {
        let mut ac = engine();
        ac.on_key(Key::Char('s'), "as", Position::new(0, 2));
        assert_eq!(candidates(ac.state()), ["as", "assert", "async"]);

        let mut capped = AutocompleteEngine::new(
            Lexicon::python(),
            AutocompleteOptions {
                max_candidates: 2,
                ..Default::default()
            },
        );
        capped.on_key(Key::Char('s'), "as", Position::new(0, 2));
        assert_eq!(candidates(capped.state()), ["as", "assert"]);
    }

    #[test]
    fn test_paste_recomputes() {
        let mut ac = engine();
        ac.on_key(Key::Paste, "x = wh", Position::new(0, 6));
        assert_eq!(candidates(ac.state()), ["while"]);
    }

    #[test]
    fn test_accept_replaces_prefix() {
        let mut ac = engine();
        ac.on_key(Key::Char('l'), "if cl", Position::new(1, 5));

        let completion = ac.accept(0, 10).unwrap();
        assert_eq!(completion.replace, 8..10);
        assert_eq!(completion.text, "class");
        assert_eq!(completion.cursor_after(), 13);
        assert!(!ac.state().is_visible());
    }

    #[test]
    fn test_accept_out_of_range_is_noop() {
        let mut ac = engine();
        assert_eq!(ac.accept(0, 0), None);

        ac.on_key(Key::Char('l'), "cl", Position::new(0, 2));
        assert_eq!(ac.accept(5, 2), None);
        assert!(ac.state().is_visible());
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut ac = engine();
        ac.on_key(Key::Char('l'), "cl", Position::new(0, 2));
        assert!(ac.dismiss());
        assert!(!ac.dismiss());
        assert_eq!(*ac.state(), AutocompleteState::Hidden);
    }

    #[test]
    fn test_disabled_engine_stays_hidden() {
        let mut ac = AutocompleteEngine::new(
            Lexicon::python(),
            AutocompleteOptions {
                enabled: false,
                ..Default::default()
            },
        );
        ac.on_key(Key::Char('l'), "cl", Position::new(0, 2));
        assert!(!ac.state().is_visible());
    }

    #[test]
    fn test_key_from_char() {
        assert_eq!(Key::from_char(' '), Key::Space);
        assert_eq!(Key::from_char('\n'), Key::Return);
        assert_eq!(Key::from_char('x'), Key::Char('x'));
        assert!(Key::Paste.produces_content());
        assert!(!Key::Backspace.produces_content());
    }
}
