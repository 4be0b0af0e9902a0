//! Token categories and spans.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The semantic class assigned to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Keyword,
    String,
    Number,
    ImaginaryNumber,
    Boolean,
    NullLiteral,
    /// Bracket characters: `()[]{}`
    Collection,
    Comment,
    Operator,
    KnownBuiltin,
}

impl TokenCategory {
    /// Every category, in classifier pass order.
    pub const ALL: [TokenCategory; 10] = [
        TokenCategory::String,
        TokenCategory::Keyword,
        TokenCategory::Number,
        TokenCategory::ImaginaryNumber,
        TokenCategory::Boolean,
        TokenCategory::NullLiteral,
        TokenCategory::Collection,
        TokenCategory::Comment,
        TokenCategory::Operator,
        TokenCategory::KnownBuiltin,
    ];

    /// Returns the theme color key for this category.
    pub fn theme_key(&self) -> &'static str {
        match self {
            TokenCategory::Keyword => "keyword",
            TokenCategory::String => "string",
            TokenCategory::Number => "number",
            TokenCategory::ImaginaryNumber => "complex",
            TokenCategory::Boolean => "boolean",
            TokenCategory::NullLiteral => "none",
            TokenCategory::Collection => "collection",
            TokenCategory::Comment => "comment",
            TokenCategory::Operator => "operator",
            TokenCategory::KnownBuiltin => "builtins",
        }
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.theme_key())
    }
}

/// A half-open byte range of the classified text tagged with a category.
///
/// Offsets always fall on UTF-8 character boundaries of the snapshot the
/// span was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    pub category: TokenCategory,
}

impl Span {
    pub fn new(start: usize, end: usize, category: TokenCategory) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if the span can be applied to `text` as-is.
    pub fn fits(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }

    /// Converts the byte range into a character range over `text`.
    ///
    /// Returns `None` if the span does not fit `text`.
    pub fn char_range(&self, text: &str) -> Option<Range<usize>> {
        if !self.fits(text) {
            return None;
        }
        let start = text[..self.start].chars().count();
        let len = text[self.start..self.end].chars().count();
        Some(start..start + len)
    }
}
