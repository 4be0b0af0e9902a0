//! Automatic bracket closing.

/// Instruction to insert a closing bracket after a typed opener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketAction {
    /// Character offset to insert the closer at
    pub insert_at: usize,
    pub insert_text: &'static str,
    /// Where the cursor ends up: between opener and closer
    pub cursor_offset_after: usize,
}

/// Stateless per-keystroke bracket rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketCompleter {
    enabled: bool,
}

impl BracketCompleter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The closer for an opening bracket.
    pub fn closer_for(ch: char) -> Option<&'static str> {
        match ch {
            '(' => Some(")"),
            '[' => Some("]"),
            '{' => Some("}"),
            _ => None,
        }
    }

    /// Decides what to do after `ch` was typed at `cursor_offset`.
    ///
    /// The closer is inserted even when the same closer already follows the
    /// cursor.
    pub fn on_char_typed(&self, ch: char, cursor_offset: usize) -> Option<BracketAction> {
        if !self.enabled {
            return None;
        }
        let insert_text = Self::closer_for(ch)?;
        Some(BracketAction {
            insert_at: cursor_offset + 1,
            insert_text,
            cursor_offset_after: cursor_offset + 1,
        })
    }
}

impl Default for BracketCompleter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openers_get_closers() {
        let brackets = BracketCompleter::default();
        for (open, close) in [('(', ")"), ('[', "]"), ('{', "}")] {
            let action = brackets.on_char_typed(open, 4).unwrap();
            assert_eq!(action.insert_at, 5);
            assert_eq!(action.insert_text, close);
            assert_eq!(action.cursor_offset_after, 5);
        }
    }

    #[test]
    fn test_other_characters_are_ignored() {
        let brackets = BracketCompleter::default();
        for ch in [')', ']', '}', 'a', '"', '\n', ' '] {
            assert_eq!(brackets.on_char_typed(ch, 0), None);
        }
    }

    #[test]
    fn test_disabled_completer() {
        let brackets = BracketCompleter::new(false);
        assert!(!brackets.is_enabled());
        assert_eq!(brackets.on_char_typed('(', 0), None);
    }
}
