//! Undo/redo history.
//!
//! Edits are recorded as insert/delete commands and collected into groups;
//! one group is one undo step. Compound edits the core performs on a single
//! keystroke (an opener plus its auto-inserted closer, or an autocomplete
//! replacement) are wrapped in `begin_group`/`end_group` so they undo
//! together. Plain typing coalesces into the previous group while keystrokes
//! stay adjacent and arrive within the coalesce window.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single edit operation, addressed in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub kind: EditKind,
    /// Character position where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Length of the edited text in characters.
    pub fn len_chars(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns the inverse of this edit.
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Returns true if `other`, made right after `self`, continues it.
    ///
    /// Inserts continue when they start where this one ended; deletes
    /// continue as a backspace run or a forward-delete run. Newlines always
    /// start a new step.
    pub fn can_coalesce(&self, other: &Edit) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if self.content.contains('\n') || other.content.contains('\n') {
            return false;
        }

        match self.kind {
            EditKind::Insert => self.position + self.len_chars() == other.position,
            EditKind::Delete => {
                other.position + other.len_chars() == self.position
                    || self.position == other.position
            }
        }
    }

    /// Folds `other` into this edit. Only valid after `can_coalesce`.
    pub fn coalesce(&mut self, other: Edit) {
        match self.kind {
            EditKind::Insert => self.content.push_str(&other.content),
            EditKind::Delete => {
                if other.position < self.position {
                    self.content = other.content + &self.content;
                    self.position = other.position;
                } else {
                    self.content.push_str(&other.content);
                }
            }
        }
    }
}

/// Edits that are undone and redone together.
#[derive(Debug, Clone)]
pub struct EditGroup {
    /// Edits in the order they were applied
    pub edits: Vec<Edit>,
    /// When the group last grew; `None` once it may no longer coalesce
    touched: Option<Instant>,
}

impl EditGroup {
    fn new(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            touched: Some(Instant::now()),
        }
    }

    fn sealed(edits: Vec<Edit>) -> Self {
        Self {
            edits,
            touched: None,
        }
    }

    /// Character offset the cursor should land on after undoing this group.
    pub fn undo_cursor(&self) -> Option<usize> {
        self.edits.first().map(|edit| match edit.kind {
            EditKind::Insert => edit.position,
            EditKind::Delete => edit.position + edit.len_chars(),
        })
    }

    /// Character offset the cursor should land on after redoing this group.
    pub fn redo_cursor(&self) -> Option<usize> {
        self.edits.last().map(|edit| match edit.kind {
            EditKind::Insert => edit.position + edit.len_chars(),
            EditKind::Delete => edit.position,
        })
    }
}

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<EditGroup>,
    redo_stack: Vec<EditGroup>,
    max_size: usize,
    coalesce_window: Duration,
    /// Nesting depth of `begin_group` calls
    group_depth: usize,
    /// Whether the open group already has its entry on the undo stack
    group_started: bool,
}

impl History {
    /// Creates a new history keeping at most `max_size` undo steps.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_size.min(1024)),
            redo_stack: Vec::new(),
            max_size,
            coalesce_window: Duration::from_millis(300),
            group_depth: 0,
            group_started: false,
        }
    }

    /// Overrides the coalesce window. `Duration::ZERO` disables coalescing.
    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    /// Records an edit. Clears the redo stack.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if self.group_depth > 0 {
            if self.group_started {
                if let Some(group) = self.undo_stack.back_mut() {
                    group.edits.push(edit);
                    return;
                }
            }
            self.group_started = true;
            self.undo_stack.push_back(EditGroup::sealed(vec![edit]));
            self.enforce_capacity();
            return;
        }

        if let Some(last_group) = self.undo_stack.back_mut() {
            let fresh = last_group
                .touched
                .is_some_and(|t| t.elapsed() < self.coalesce_window);
            if fresh && last_group.edits.len() == 1 {
                if let Some(last_edit) = last_group.edits.last_mut() {
                    if last_edit.can_coalesce(&edit) {
                        last_edit.coalesce(edit);
                        last_group.touched = Some(Instant::now());
                        return;
                    }
                }
            }
        }

        self.undo_stack.push_back(EditGroup::new(edit));
        self.enforce_capacity();
    }

    /// Starts a group; every edit until the matching `end_group` is one step.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.group_started = false;
        }
        self.group_depth += 1;
    }

    /// Ends the innermost group.
    pub fn end_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.group_started = false;
        }
    }

    /// Pops the last undo step and moves it onto the redo stack.
    ///
    /// The returned group lists edits in application order; the caller
    /// reverses them.
    pub fn undo(&mut self) -> Option<EditGroup> {
        let mut group = self.undo_stack.pop_back()?;
        group.touched = None;
        self.redo_stack.push(group.clone());
        Some(group)
    }

    /// Pops the last redo step and moves it back onto the undo stack.
    pub fn redo(&mut self) -> Option<EditGroup> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push_back(group.clone());
        Some(group)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Forgets everything (used when a new document is loaded).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.group_depth = 0;
        self.group_started = false;
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    fn enforce_capacity(&mut self) {
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_coalesce() -> History {
        History::new(100).with_coalesce_window(Duration::ZERO)
    }

    #[test]
    fn test_edit_inverse() {
        let inverse = Edit::insert(0, "hello").inverse();
        assert_eq!(inverse.kind, EditKind::Delete);
        assert_eq!(inverse.position, 0);
        assert_eq!(inverse.content, "hello");
    }

    #[test]
    fn test_adjacent_typing_coalesces() {
        let mut history = History::new(100).with_coalesce_window(Duration::from_secs(60));
        history.push(Edit::insert(0, "i"));
        history.push(Edit::insert(1, "f"));
        assert_eq!(history.undo_count(), 1);

        let group = history.undo().unwrap();
        assert_eq!(group.edits, vec![Edit::insert(0, "if")]);
    }

    #[test]
    fn test_newline_breaks_coalescing() {
        let mut history = History::new(100).with_coalesce_window(Duration::from_secs(60));
        history.push(Edit::insert(0, "x"));
        history.push(Edit::insert(1, "\n"));
        assert_eq!(history.undo_count(), 2);
    }

    #[test]
    fn test_group_undoes_as_one_step() {
        let mut history = no_coalesce();
        history.begin_group();
        history.push(Edit::delete(8, "cl"));
        history.push(Edit::insert(8, "class"));
        history.end_group();

        assert_eq!(history.undo_count(), 1);
        let group = history.undo().unwrap();
        assert_eq!(group.edits.len(), 2);
        assert_eq!(group.undo_cursor(), Some(10));
        assert_eq!(group.redo_cursor(), Some(13));
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut history = no_coalesce();
        history.push(Edit::insert(0, "a"));
        history.undo();
        assert!(history.can_redo());

        history.push(Edit::insert(0, "b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut history = History::new(2).with_coalesce_window(Duration::ZERO);
        for i in 0..5 {
            history.push(Edit::insert(i, "x"));
        }
        assert_eq!(history.undo_count(), 2);
    }
}
